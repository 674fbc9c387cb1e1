//! 核心层：错误、通知、响应归一化

pub mod error;
pub mod notice;
pub mod response;

pub use error::{CoreError, ErrorBody, Result};
pub use notice::{ChannelSink, Notice, NoticeKind, NoticeSink};
pub use response::parse_product_list;
