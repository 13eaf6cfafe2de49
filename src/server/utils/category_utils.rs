/// ordered keyword table, the first row with a keyword contained in the title wins
const CATEGORY_TABLE: &[(&[&str], &str)] = &[
    (&["ipl", "indian premier"], "IPL"),
    (&["psl", "pakistan super"], "PSL"),
    (&["bbl", "big bash"], "BBL"),
    (&["cpl", "caribbean"], "CPL"),
    (&["world cup", "champions trophy"], "ICC Events"),
    (&["women", "wpl"], "Women's Cricket"),
    (&["t20", "t10"], "T20"),
    (&["test"], "Test Cricket"),
    (&["odi", "one day"], "ODI"),
    (&["ptv", "ten sports", "a sports", "geo"], "Pakistan"),
    (&["star", "sony", "willow", "hotstar", "dd sports"], "India"),
    (&["sky", "tnt", "bt sport"], "UK"),
    (&["fox", "kayo"], "Australia"),
];

pub const DEFAULT_CATEGORY: &str = "International";

pub fn categorize(title: &str) -> &'static str {
    let lower = title.to_lowercase();

    CATEGORY_TABLE
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, category)| *category)
        .unwrap_or(DEFAULT_CATEGORY)
}
