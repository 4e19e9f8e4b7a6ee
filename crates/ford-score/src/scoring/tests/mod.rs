mod common;
mod input;
mod routing;
