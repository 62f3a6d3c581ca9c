//! White-box property tests that need `Value`'s `quickcheck::Arbitrary` impl
//! (only compiled for this crate's own `cargo test`, not for the black-box
//! suites under `tests/`, which only see the public API).

mod properties;
