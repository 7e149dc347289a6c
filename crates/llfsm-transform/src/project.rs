//! Projection of domain values back into flat editor models.
//!
//! Layouts cannot be recovered from the domain, so the caller supplies one per
//! state and one per transition. Re-converting a projected machine yields a
//! machine equal to the original.

use std::collections::BTreeSet;
use std::fmt::Display;
use std::path::Path;

use llfsm_model::{
    self as model, ActionModel, ArrangementModel, ClockModel, MachineModel, MachineReference,
    StateLayout, StateModel, TransitionLayout, TransitionModel,
};
use llfsm_vhdl::{Clock, VariableName};

use crate::domain::{Arrangement, Machine, State, Transition, VariableMapping};
use crate::error::{ConversionError, Result};

fn join_lines<T: Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

fn check_layouts(kind: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(ConversionError::LayoutMismatch {
            kind,
            expected,
            found,
        })
    }
}

/// Rebuild the editor model of `machine`.
///
/// Fails only when the layout counts differ from the state and transition counts.
pub fn project_machine(
    machine: &Machine,
    state_layouts: &[StateLayout],
    transition_layouts: &[TransitionLayout],
) -> Result<MachineModel> {
    check_layouts("state", machine.states().len(), state_layouts.len())?;
    check_layouts(
        "transition",
        machine.transitions().len(),
        transition_layouts.len(),
    )?;

    let actions = machine.actions();
    let states = machine.states();
    let state_name = |index: usize| states[index].name().to_string();

    Ok(MachineModel {
        states: states
            .iter()
            .zip(state_layouts)
            .map(|(state, layout)| project_state(state, actions, *layout))
            .collect(),
        external_variables: join_lines(machine.external_signals()),
        machine_variables: join_lines(machine.machine_signals()),
        includes: join_lines(machine.includes()),
        transitions: machine
            .transitions()
            .iter()
            .zip(transition_layouts)
            .map(|(transition, layout)| project_transition(transition, states, *layout))
            .collect(),
        initial_state: state_name(machine.initial_state()),
        suspended_state: machine.suspended_state().map(state_name),
        clocks: machine.clocks().iter().map(project_clock).collect(),
    })
}

/// Rebuild one state. Every name in `actions` gets an entry, with empty code
/// when the state has none for it, so each state lists the same actions.
pub fn project_state(
    state: &State,
    actions: &BTreeSet<VariableName>,
    layout: StateLayout,
) -> StateModel {
    StateModel {
        name: state.name().to_string(),
        variables: join_lines(state.signals()),
        external_variables: join_lines(state.external_variables()),
        actions: actions
            .iter()
            .map(|action| {
                let code = state
                    .action(action)
                    .map(ToString::to_string)
                    .unwrap_or_default();
                ActionModel::new(action.as_str(), code)
            })
            .collect(),
        layout,
    }
}

/// Rebuild one transition, naming its endpoints.
pub fn project_transition(
    transition: &Transition,
    states: &[State],
    layout: TransitionLayout,
) -> TransitionModel {
    TransitionModel {
        source: states[transition.source()].name().to_string(),
        target: states[transition.target()].name().to_string(),
        condition: transition.condition().to_string(),
        layout,
    }
}

fn project_clock(clock: &Clock) -> ClockModel {
    ClockModel::new(clock.name.as_str(), clock.frequency.to_string())
}

fn project_mapping(mapping: &VariableMapping) -> model::VariableMapping {
    model::VariableMapping::new(mapping.source().as_str(), mapping.destination().as_str())
}

/// Rebuild the editor model of `arrangement`.
///
/// Machine reference paths are made relative to `base_dir` where possible, so
/// converting the result against the same `base_dir` finds the same machines.
pub fn project_arrangement(arrangement: &Arrangement, base_dir: &Path) -> ArrangementModel {
    ArrangementModel {
        clocks: arrangement.clocks().iter().map(project_clock).collect(),
        external_variables: join_lines(arrangement.external_signals()),
        machines: arrangement
            .machines()
            .iter()
            .map(|(instance, mapping)| {
                let path = mapping.machine().path();
                let path = path.strip_prefix(base_dir).unwrap_or(path);
                MachineReference::new(
                    instance.name().as_str(),
                    path.to_string_lossy(),
                    mapping.mappings().iter().map(project_mapping).collect(),
                )
            })
            .collect(),
        global_variables: join_lines(arrangement.signals()),
        global_mappings: arrangement
            .global_mappings()
            .iter()
            .map(project_mapping)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::convert_machine;
    use llfsm_model::{BezierPath, Point2D};

    fn state(name: &str, variables: &str, externals: &str, actions: &[(&str, &str)]) -> StateModel {
        StateModel {
            name: name.into(),
            variables: variables.into(),
            external_variables: externals.into(),
            actions: actions.iter().map(|(n, c)| ActionModel::new(*n, *c)).collect(),
            layout: StateLayout::new(Point2D::new(1.0, 2.0), Point2D::new(200.0, 100.0)),
        }
    }

    fn model() -> MachineModel {
        MachineModel {
            states: vec![
                state(
                    "state1",
                    "signal s1_x: std_logic;\nsignal s1_y: integer range 0 to 3 := 2;",
                    "x\ny",
                    &[("OnEntry", "y <= '1';"), ("OnExit", ""), ("Internal", "")],
                ),
                state(
                    "state2",
                    "",
                    "",
                    &[("OnExit", "if x = '1' then\n    y <= '0';\nend if;"), ("OnEntry", ""), ("Internal", "")],
                ),
            ],
            external_variables: "x: in std_logic;\ny: out std_logic;".into(),
            machine_variables: "signal z: std_logic := '0';".into(),
            includes: "library IEEE;\nuse IEEE.std_logic_1164.all;".into(),
            transitions: vec![TransitionModel {
                source: "state1".into(),
                target: "state2".into(),
                condition: "x = '1' and z = '0'".into(),
                layout: TransitionLayout::new(BezierPath::default()),
            }],
            initial_state: "state1".into(),
            suspended_state: Some("state2".into()),
            clocks: vec![ClockModel::new("clk", "100MHz")],
        }
    }

    #[test]
    fn projection_text_blocks() {
        let m = model();
        let machine = convert_machine(&m, None).unwrap();
        let projected =
            project_machine(&machine, &m.state_layouts(), &m.transition_layouts()).unwrap();
        assert_eq!(projected.includes, "library IEEE;\nuse IEEE.std_logic_1164.all;");
        assert_eq!(projected.external_variables, "x: in std_logic;\ny: out std_logic;");
        assert_eq!(projected.machine_variables, "signal z: std_logic := '0';");
        assert_eq!(projected.states[0].external_variables, "x\ny");
        assert_eq!(projected.clocks[0].frequency, "100 MHz");
        assert_eq!(projected.transitions[0].condition, "x = '1' and z = '0'");
        assert_eq!(projected.suspended_state.as_deref(), Some("state2"));
        assert_eq!(projected.states[0].layout, m.states[0].layout);
    }

    #[test]
    fn projection_lists_every_action_sorted() {
        let m = model();
        let machine = convert_machine(&m, None).unwrap();
        let projected =
            project_machine(&machine, &m.state_layouts(), &m.transition_layouts()).unwrap();
        let names: Vec<&str> = projected.states[1]
            .actions
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(names, vec!["Internal", "OnEntry", "OnExit"]);
        assert_eq!(projected.states[1].actions[0].code, "");
        assert_eq!(
            projected.states[1].actions[2].code,
            "if x = '1' then\n    y <= '0';\nend if;"
        );
    }

    #[test]
    fn round_trip_is_identity() {
        let m = model();
        let machine = convert_machine(&m, None).unwrap();
        let projected =
            project_machine(&machine, &m.state_layouts(), &m.transition_layouts()).unwrap();
        let again = convert_machine(&projected, None).unwrap();
        assert_eq!(again, machine);
    }

    #[test]
    fn round_trip_without_canonical_actions() {
        let mut m = model();
        for s in &mut m.states {
            s.actions.retain(|a| a.name == "OnEntry");
        }
        let machine = convert_machine(&m, None).unwrap();
        let projected =
            project_machine(&machine, &m.state_layouts(), &m.transition_layouts()).unwrap();
        assert_eq!(projected.states[0].actions.len(), 1);
        assert_eq!(convert_machine(&projected, None).unwrap(), machine);
    }

    #[test]
    fn layout_counts_must_match() {
        let m = model();
        let machine = convert_machine(&m, None).unwrap();
        let err = project_machine(&machine, &[], &m.transition_layouts()).unwrap_err();
        assert!(matches!(
            err,
            ConversionError::LayoutMismatch { kind: "state", expected: 2, found: 0 }
        ));
        let too_many = vec![TransitionLayout::default(); 2];
        assert!(matches!(
            project_machine(&machine, &m.state_layouts(), &too_many),
            Err(ConversionError::LayoutMismatch { kind: "transition", .. })
        ));
    }
}
