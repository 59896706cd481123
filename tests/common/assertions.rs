//! Custom test assertions

/// Assertions on Prometheus text exposition
pub trait ExpositionAssertions {
    /// Assert a sample line is present verbatim
    fn assert_sample(&self, line: &str);

    /// Assert no sample of `metric` is present
    fn assert_no_samples(&self, metric: &str);
}

impl ExpositionAssertions for str {
    fn assert_sample(&self, line: &str) {
        assert!(
            self.lines().any(|candidate| candidate == line),
            "Expected sample {:?} in:\n{}",
            line,
            self
        );
    }

    fn assert_no_samples(&self, metric: &str) {
        let found = self
            .lines()
            .filter(|line| !line.starts_with('#'))
            .find(|line| {
                line.strip_prefix(metric)
                    .is_some_and(|rest| rest.starts_with('{') || rest.starts_with(' '))
            });
        assert!(found.is_none(), "Unexpected sample {:?} in:\n{}", found, self);
    }
}
