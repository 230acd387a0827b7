mod achievements;
mod common;
