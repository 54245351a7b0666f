//! Handler for `pomwalk classpath`.

use miette::Result;

use pomwalk_ops::ops_classpath::{self, ClasspathFormat, ClasspathOptions};
use pomwalk_ops::session::SessionOptions;

pub async fn exec(session: &SessionOptions, format: ClasspathFormat, conflicts: bool) -> Result<()> {
    let opts = ClasspathOptions { format, conflicts };
    ops_classpath::classpath(session, &opts).await
}
