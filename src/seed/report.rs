use std::fmt;

/// Document counts written by one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub configurations: usize,
    pub users_created: usize,
    pub users_skipped: usize,
    pub items: usize,
    pub bundles: usize,
    pub reservations: usize,
    pub transports: usize,
}

impl fmt::Display for SeedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "configurations={} users_created={} users_skipped={} items={} bundles={} reservations={} transports={}",
            self.configurations,
            self.users_created,
            self.users_skipped,
            self.items,
            self.bundles,
            self.reservations,
            self.transports
        )
    }
}

/// Outcome of the user stage. `created` holds identity ids, `skipped` the
/// emails whose identity could not be created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserTally {
    pub created: Vec<String>,
    pub skipped: Vec<String>,
}

/// Ids written by the reservation stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationTally {
    pub reservations: Vec<String>,
    pub transports: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::SeedReport;

    #[test]
    fn report_reads_as_one_line() {
        let report = SeedReport {
            configurations: 4,
            users_created: 3,
            users_skipped: 1,
            items: 9,
            bundles: 4,
            reservations: 2,
            transports: 1,
        };
        assert_eq!(
            report.to_string(),
            "configurations=4 users_created=3 users_skipped=1 items=9 bundles=4 reservations=2 transports=1"
        );
    }
}
