//! Integration tests for the fontmin pipeline.

mod helpers;

mod codec_test;
