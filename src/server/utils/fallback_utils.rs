use crate::server::dtos::{ChannelDto, DataSource, StreamKind, StreamMatch};
use crate::server::utils::category_utils::categorize;

/// last channels seen working on the directory site, served verbatim when scraping gives nothing
///
/// (title, icon, channel page, stream url)
const FALLBACK_CHANNELS: &[(&str, &str, &str, Option<&str>)] = &[
    (
        "Star Sports 1",
        "https://profamouslife.com/images/star-sports-1.png",
        "https://profamouslife.com/channels/star-sports-1.php",
        Some("https://streamcrichd.com/update/star1.php"),
    ),
    (
        "Willow Cricket",
        "https://profamouslife.com/images/willow.png",
        "https://profamouslife.com/channels/willow.php",
        Some("https://streamcrichd.com/update/willow.php"),
    ),
    (
        "Sky Sports Cricket",
        "https://profamouslife.com/images/sky-cricket.png",
        "https://profamouslife.com/channels/sky-cricket.php",
        Some("https://streamcrichd.com/update/skyscric.php"),
    ),
    (
        "PTV Sports",
        "https://profamouslife.com/images/ptv-sports.png",
        "https://profamouslife.com/channels/ptv-sports.php",
        Some("https://streamcrichd.com/update/ptvsp.php"),
    ),
    (
        "Ten Sports",
        "https://profamouslife.com/images/ten-sports.png",
        "https://profamouslife.com/channels/ten-sports.php",
        Some("https://streamcrichd.com/update/tensp.php"),
    ),
    (
        "A Sports HD",
        "https://profamouslife.com/images/a-sports.png",
        "https://profamouslife.com/channels/a-sports.php",
        Some("https://streamcrichd.com/update/asports.php"),
    ),
    (
        "Fox Cricket",
        "https://profamouslife.com/images/fox-cricket.png",
        "https://profamouslife.com/channels/fox-cricket.php",
        None,
    ),
    (
        "Sony Sports Ten 1",
        "https://profamouslife.com/images/sony-ten-1.png",
        "https://profamouslife.com/channels/sony-ten-1.php",
        None,
    ),
];

pub fn fallback_channels() -> Vec<ChannelDto> {
    FALLBACK_CHANNELS
        .iter()
        .map(|(title, icon, url, stream)| {
            let mut channel = ChannelDto::pending(*title, *icon, *url, DataSource::Fallback);
            channel.category = categorize(title).to_string();
            channel.apply_stream(stream.map(|s| StreamMatch::new(s, StreamKind::Iframe)));
            channel
        })
        .collect()
}
