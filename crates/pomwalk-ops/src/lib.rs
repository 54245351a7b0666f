pub mod ops_classpath;
pub mod ops_properties;
pub mod ops_tree;
pub mod session;
