//! Actions and their translation into simulator commands.
use mallow_core::{error::EnvError, Act};
use std::collections::HashSet;

/// Action for [`MalmoEnv`](crate::MalmoEnv).
///
/// A discrete action selects one of the declared command templates by
/// index; a continuous action supplies one value per declared template,
/// in order.
#[derive(Clone, Debug, PartialEq)]
pub enum MalmoAct {
    /// Index into the declared command templates.
    Discrete(usize),

    /// One value per declared command template, at most one for each.
    Continuous(Vec<f32>),
}

impl Act for MalmoAct {
    fn len(&self) -> usize {
        match self {
            MalmoAct::Discrete(_) => 1,
            MalmoAct::Continuous(v) => v.len(),
        }
    }
}

impl From<usize> for MalmoAct {
    fn from(ix: usize) -> Self {
        MalmoAct::Discrete(ix)
    }
}

impl From<Vec<f32>> for MalmoAct {
    fn from(v: Vec<f32>) -> Self {
        MalmoAct::Continuous(v)
    }
}

/// The ordered command strings produced from one action.
#[derive(Clone, Debug, PartialEq)]
pub struct CommandSet(Vec<String>);

impl CommandSet {
    /// The commands in issue order.
    pub fn commands(&self) -> &[String] {
        &self.0
    }
}

/// Verbs whose commands persist until explicitly cancelled with
/// `<verb> 0`, matching the simulator's continuous movement handlers.
const DEFAULT_STATEFUL_VERBS: [&str; 8] = [
    "move", "strafe", "pitch", "turn", "jump", "crouch", "attack", "use",
];

/// Maps abstract actions to simulator command sets.
///
/// The template table is immutable after construction. Translation is a
/// pure function of the action and the table; remembering and
/// cancelling the previously issued set is the session's job, for which
/// [`ActionTranslator::cancellations`] computes the commands.
#[derive(Clone, Debug)]
pub struct ActionTranslator {
    templates: Vec<String>,
    stateful: HashSet<String>,
}

impl ActionTranslator {
    /// Builds a translator over the declared command templates.
    ///
    /// For discrete use the templates are complete commands
    /// (`"move 1"`); for continuous use they are verbs (`"move"`) that
    /// get the value appended. `stateful_verbs` replaces the default
    /// continuous-movement verb set when given.
    pub fn build(
        templates: &[String],
        stateful_verbs: Option<&[String]>,
    ) -> Result<Self, EnvError> {
        if templates.is_empty() {
            return Err(EnvError::Configuration(
                "at least one action template must be declared".into(),
            ));
        }
        let stateful = match stateful_verbs {
            Some(verbs) => verbs.iter().cloned().collect(),
            None => DEFAULT_STATEFUL_VERBS
                .iter()
                .map(|v| v.to_string())
                .collect(),
        };
        Ok(Self {
            templates: templates.to_vec(),
            stateful,
        })
    }

    /// The number of declared templates, which is the session's action
    /// count.
    pub fn action_count(&self) -> usize {
        self.templates.len()
    }

    /// Translates an action into the commands to issue this tick.
    ///
    /// Fails with `InvalidAction` when a discrete index is out of
    /// bounds or a continuous vector is longer than the template table.
    pub fn translate(&self, action: &MalmoAct) -> Result<CommandSet, EnvError> {
        match action {
            MalmoAct::Discrete(ix) => {
                let template = self.templates.get(*ix).ok_or_else(|| {
                    EnvError::InvalidAction(format!(
                        "action {} is not valid (should be in [0, {}))",
                        ix,
                        self.templates.len()
                    ))
                })?;
                Ok(CommandSet(vec![template.clone()]))
            }
            MalmoAct::Continuous(values) => {
                if values.len() > self.templates.len() {
                    return Err(EnvError::InvalidAction(format!(
                        "action list of length {} is not valid (should be of length [0, {}])",
                        values.len(),
                        self.templates.len()
                    )));
                }
                let commands = self
                    .templates
                    .iter()
                    .zip(values.iter())
                    .map(|(verb, value)| format!("{} {}", verb, value))
                    .collect();
                Ok(CommandSet(commands))
            }
        }
    }

    /// The cancel commands to issue before `next`, given the previously
    /// issued set.
    ///
    /// Identical repeated sets cancel nothing. Otherwise every stateful
    /// command of `previous` gets its `<verb> 0` complement, in issue
    /// order. The caller must send these before any command of `next`;
    /// reversing the order leaves the simulated agent holding two
    /// conflicting states at once.
    pub fn cancellations(&self, previous: Option<&CommandSet>, next: &CommandSet) -> Vec<String> {
        let previous = match previous {
            Some(p) if p != next => p,
            _ => return Vec::new(),
        };
        previous
            .commands()
            .iter()
            .filter_map(|command| {
                let verb = command.split_whitespace().next()?;
                if self.stateful.contains(verb) {
                    Some(format!("{} 0", verb))
                } else {
                    None
                }
            })
            .collect()
    }
}
