//! Maven manifest plumbing: POM XML parsing into the generic tree, local
//! repository layout, and the manifest sources the resolver reads through.

pub mod repository;
pub mod source;
pub mod xml;
