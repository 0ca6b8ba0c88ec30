//! Small helper macros.
//!

/// Build a `PathBuf` out of any number of components.
///
/// ```
/// use std::path::PathBuf;
/// use swarmviz_common::makepath;
///
/// let p: PathBuf = makepath!("/tmp", "swarmviz", "config.hcl");
/// assert_eq!(PathBuf::from("/tmp/swarmviz/config.hcl"), p);
/// ```
///
#[macro_export]
macro_rules! makepath {
    ($($item:expr),+) => {
        [
        $(::std::path::PathBuf::from($item),)+
        ]
        .iter()
        .collect::<::std::path::PathBuf>()
    };
}
