//! Result decoder test suite

mod result_set_tests;
