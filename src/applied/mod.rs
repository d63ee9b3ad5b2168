mod plain_tree;
mod rb_tree;

pub use self::plain_tree::*;
pub use self::rb_tree::*;
