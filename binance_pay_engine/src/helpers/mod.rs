mod memo;

pub use memo::{generate_memo, MEMO_LENGTH};
