//! Handler for `pomwalk properties`.

use miette::Result;

use pomwalk_ops::ops_properties::{self, PropertiesOptions};
use pomwalk_ops::session::SessionOptions;

pub async fn exec(session: &SessionOptions, env: bool) -> Result<()> {
    ops_properties::properties(session, &PropertiesOptions { env }).await
}
