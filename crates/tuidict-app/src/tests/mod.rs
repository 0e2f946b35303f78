mod lookup_tests;
mod session_loop_tests;
mod support;
