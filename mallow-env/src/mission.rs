//! Static description of a mission.
use mallow_core::error::EnvError;
use serde::{Deserialize, Serialize};

/// The static bundle describing one mission.
///
/// The adapter consumes only the name and the roster length; the world
/// description is opaque XML owned by whoever authored the mission and
/// is handed to the simulator client verbatim.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MissionDescriptor {
    name: String,
    agent_names: Vec<String>,
    world_xml: String,
}

impl MissionDescriptor {
    /// Builds a mission descriptor, validating it is complete.
    pub fn build(
        name: impl Into<String>,
        agent_names: Vec<String>,
        world_xml: impl Into<String>,
    ) -> Result<Self, EnvError> {
        let name = name.into();
        let world_xml = world_xml.into();
        if name.is_empty() {
            return Err(EnvError::Configuration("mission must have a name".into()));
        }
        if agent_names.is_empty() {
            return Err(EnvError::Configuration(
                "mission must have at least 1 agent".into(),
            ));
        }
        if world_xml.is_empty() {
            return Err(EnvError::Configuration(
                "a mission world description must be defined".into(),
            ));
        }
        Ok(Self {
            name,
            agent_names,
            world_xml,
        })
    }

    /// Name of the mission.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Agent names, in role order.
    pub fn agent_names(&self) -> &[String] {
        &self.agent_names
    }

    /// Number of roles in the mission.
    pub fn role_count(&self) -> usize {
        self.agent_names.len()
    }

    /// The opaque world description.
    pub fn world_xml(&self) -> &str {
        &self.world_xml
    }
}

#[cfg(test)]
mod tests {
    use super::MissionDescriptor;

    #[test]
    fn complete_descriptor_is_accepted() {
        let m = MissionDescriptor::build(
            "multi_agent",
            vec!["Agent_1".into(), "Agent_2".into(), "Observer".into()],
            "<Mission/>",
        )
        .unwrap();
        assert_eq!(m.role_count(), 3);
        assert_eq!(m.agent_names()[2], "Observer");
    }

    #[test]
    fn incomplete_descriptors_are_rejected() {
        assert!(MissionDescriptor::build("", vec!["A".into()], "<Mission/>").is_err());
        assert!(MissionDescriptor::build("m", vec![], "<Mission/>").is_err());
        assert!(MissionDescriptor::build("m", vec!["A".into()], "").is_err());
    }
}
