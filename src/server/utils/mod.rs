pub mod category_utils;
pub mod fallback_utils;
pub mod fid_utils;
pub mod html_utils;
pub mod http_utils;
pub mod url_utils;
