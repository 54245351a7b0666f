//! Handler for `pomwalk tree`.

use miette::Result;

use pomwalk_ops::ops_tree::{self, TreeOptions};
use pomwalk_ops::session::SessionOptions;

pub async fn exec(session: &SessionOptions, depth: Option<u32>, why: Option<String>) -> Result<()> {
    let opts = TreeOptions {
        depth: depth.map(|d| d as usize),
        why,
    };
    ops_tree::tree(session, &opts).await
}
