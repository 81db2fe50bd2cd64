mod common;
mod folding;
mod lifecycle;
