mod board;
mod common;
mod routing;
