use super::status::PlatformStatus;

/// Counters shown in the summary cards above the status table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryCounts {
    pub active_monitoring: usize,
    pub new_posts: usize,
    pub errors: usize,
}

impl SummaryCounts {
    pub fn from_platforms(platforms: &[PlatformStatus]) -> Self {
        Self {
            active_monitoring: platforms.iter().filter(|p| p.check_count > 0).count(),
            new_posts: platforms.iter().filter(|p| p.has_new_post).count(),
            errors: platforms.iter().filter(|p| p.error().is_some()).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_are_independent() {
        let platforms = vec![
            PlatformStatus {
                platform: "LinkedIn".into(),
                check_count: 4,
                has_new_post: true,
                error_message: Some("login wall".into()),
                ..Default::default()
            },
            PlatformStatus {
                platform: "TikTok".into(),
                check_count: 0,
                error_message: Some(String::new()),
                ..Default::default()
            },
            PlatformStatus {
                platform: "X".into(),
                check_count: 2,
                ..Default::default()
            },
        ];
        assert_eq!(
            SummaryCounts::from_platforms(&platforms),
            SummaryCounts {
                active_monitoring: 2,
                new_posts: 1,
                errors: 1,
            }
        );
    }

    #[test]
    fn empty_input_counts_zero() {
        assert_eq!(SummaryCounts::from_platforms(&[]), SummaryCounts::default());
    }
}
