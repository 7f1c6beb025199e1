pub const SHORT_ID_LEN: usize = 12;

/// Snapshot of one container as reported by the engine at fetch time.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ContainerRecord {
    pub id: String,
    pub image: String,
    pub status_text: String,
    pub state_tag: String,
}

impl ContainerRecord {
    pub fn new(
        engine_id: &str,
        image: impl Into<String>,
        status_text: impl Into<String>,
        state_tag: impl Into<String>,
    ) -> Self {
        Self {
            id: short_id(engine_id),
            image: image.into(),
            status_text: status_text.into(),
            state_tag: state_tag.into(),
        }
    }

    pub fn state_class(&self) -> StateClass {
        StateClass::from_tag(&self.state_tag)
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum StateClass {
    Running,
    Exited,
    Other,
}

impl StateClass {
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim();
        if tag.eq_ignore_ascii_case("running") {
            Self::Running
        } else if tag.eq_ignore_ascii_case("exited") {
            Self::Exited
        } else {
            Self::Other
        }
    }
}

/// Identifier form used for display and for passing back to start/stop.
pub fn short_id(engine_id: &str) -> String {
    engine_id.trim().chars().take(SHORT_ID_LEN).collect()
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub struct StateCounts {
    pub running: usize,
    pub exited: usize,
    pub other: usize,
}

impl StateCounts {
    pub fn tally(records: &[ContainerRecord]) -> Self {
        records
            .iter()
            .fold(Self::default(), |mut counts, record| {
                match record.state_class() {
                    StateClass::Running => counts.running += 1,
                    StateClass::Exited => counts.exited += 1,
                    StateClass::Other => counts.other += 1,
                }
                counts
            })
    }
}

#[cfg(test)]
mod tests {
    use super::{ContainerRecord, SHORT_ID_LEN, StateClass, StateCounts, short_id};

    #[test]
    fn engine_id_is_cut_to_twelve_chars() {
        let engine_id = "4f66ad9a0b2e6f0c1a3d5e7f9b8c7d6e5f4a3b2c";
        assert_eq!(engine_id.len(), 40);

        let record = ContainerRecord::new(engine_id, "nginx:latest", "Up 2 hours", "running");
        assert_eq!(record.id, "4f66ad9a0b2e");
        assert_eq!(record.id.len(), SHORT_ID_LEN);
    }

    #[test]
    fn short_ids_are_kept_as_is() {
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(short_id(""), "");
        assert_eq!(short_id("abc123def456"), "abc123def456");
    }

    #[test]
    fn image_is_not_truncated_by_the_model() {
        let image = "registry.example.com/team/very-long-service-name-for-testing:2024.10.01";
        let record = ContainerRecord::new("abc", image, "", "");
        assert_eq!(record.image, image);
    }

    #[test]
    fn state_tags_map_to_display_classes() {
        assert_eq!(StateClass::from_tag("running"), StateClass::Running);
        assert_eq!(StateClass::from_tag("Running"), StateClass::Running);
        assert_eq!(StateClass::from_tag("exited"), StateClass::Exited);
        assert_eq!(StateClass::from_tag("paused"), StateClass::Other);
        assert_eq!(StateClass::from_tag("restarting"), StateClass::Other);
        assert_eq!(StateClass::from_tag(""), StateClass::Other);
    }

    #[test]
    fn counts_follow_state_classes() {
        let records = vec![
            ContainerRecord::new("a", "img", "Up", "running"),
            ContainerRecord::new("b", "img", "Exited (0)", "exited"),
            ContainerRecord::new("c", "img", "Up", "running"),
            ContainerRecord::new("d", "img", "Up (Paused)", "paused"),
        ];
        assert_eq!(
            StateCounts::tally(&records),
            StateCounts {
                running: 2,
                exited: 1,
                other: 1
            }
        );
    }
}
