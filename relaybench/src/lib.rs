#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub use relaybench_client::*;
pub use relaybench_fleet::*;
