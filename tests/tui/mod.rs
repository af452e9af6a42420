mod common;
mod completion_test;
mod headless_test;
