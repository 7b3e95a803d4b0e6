mod billing;
mod common;
mod routing;
