//! Shared test utilities for `regioncut-core`.

use proptest::test_runner::Config as ProptestConfig;
use regioncut_test_support::proptest_profile::ProptestRunProfile;

/// Builds a standard proptest configuration from the shared run profile.
///
/// Keeps property suites aligned on the same `PROGTEST_CASES` handling.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases);
    ProptestConfig {
        cases: profile.cases(),
        ..ProptestConfig::default()
    }
}
