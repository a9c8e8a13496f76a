use crate::lit::VariableId;

/// A three-state boolean: true, false, or unassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum OptBool {
    False,
    True,
    #[default]
    Unassigned,
}

impl OptBool {
    #[inline(always)]
    pub fn is_some(self) -> bool {
        self != OptBool::Unassigned
    }

    #[inline(always)]
    pub fn is_none(self) -> bool {
        self == OptBool::Unassigned
    }

    #[inline(always)]
    pub fn is_true(self) -> bool {
        self == OptBool::True
    }

    #[inline(always)]
    pub fn is_false(self) -> bool {
        self == OptBool::False
    }

    #[inline(always)]
    pub fn unwrap_or(self, default: bool) -> bool {
        match self {
            OptBool::True => true,
            OptBool::False => false,
            OptBool::Unassigned => default,
        }
    }
}

impl From<bool> for OptBool {
    #[inline(always)]
    fn from(b: bool) -> Self {
        if b { OptBool::True } else { OptBool::False }
    }
}

/// Serializes an assignment as one signed DIMACS literal per variable, in
/// ascending variable order. Unassigned variables default to false.
pub fn to_model(values: &[OptBool]) -> Vec<i32> {
    values
        .iter()
        .enumerate()
        .map(|(var, &value)| {
            let dimacs = var as i32 + 1;
            if value.is_true() { dimacs } else { -dimacs }
        })
        .collect()
}

/// Manages the partial assignment of variables during search.
/// Supports decisions, unit propagations, and chronological backtracking.
pub struct PartialAssignment {
    /// The current value of each variable.
    values: Vec<OptBool>,
    /// A chronological stack of all assignments made at decision level > 0.
    trail: Vec<VariableId>,
    /// One entry per open decision level.
    levels: Vec<DecisionLevel>,
    /// The number of currently assigned variables.
    num_assigned: usize,
}

#[derive(Debug, Clone, Copy)]
struct DecisionLevel {
    /// Index into the trail where the decision variable of this level is stored.
    trail_mark: usize,
    /// Whether the second polarity of the decision has already been tried.
    flipped: bool,
}

impl PartialAssignment {
    pub fn new(num_vars: usize) -> Self {
        Self::with_seed(&vec![OptBool::Unassigned; num_vars])
    }

    /// Creates an assignment seeded with level-0 values that are never undone
    /// by backtracking.
    pub fn with_seed(seed: &[OptBool]) -> Self {
        PartialAssignment {
            num_assigned: seed.iter().filter(|v| v.is_some()).count(),
            values: seed.to_vec(),
            trail: Vec::new(),
            levels: Vec::new(),
        }
    }

    #[inline(always)]
    pub fn values(&self) -> &[OptBool] {
        &self.values
    }

    #[inline(always)]
    pub fn value(&self, var: VariableId) -> OptBool {
        self.values[var]
    }

    #[inline(always)]
    pub fn is_assigned(&self, var: VariableId) -> bool {
        self.values[var].is_some()
    }

    /// Checks if all variables are assigned.
    pub fn is_complete(&self) -> bool {
        self.num_assigned == self.values.len()
    }

    /// Returns the current decision level (depth of the search tree).
    pub fn decision_level(&self) -> usize {
        self.levels.len()
    }

    /// Assigns a variable during unit propagation.
    /// Assumes the variable is unassigned.
    pub fn assign(&mut self, var: VariableId, value: bool) {
        debug_assert!(
            self.values[var].is_none(),
            "Trying to assign the already assigned variable {}.",
            var
        );
        self.values[var] = OptBool::from(value);
        self.num_assigned += 1;
        self.trail.push(var);
    }

    /// Starts a new decision level by assigning a chosen variable.
    pub fn decide(&mut self, var: VariableId, value: bool) {
        debug_assert!(self.values[var].is_none());
        self.levels.push(DecisionLevel {
            trail_mark: self.trail.len(),
            flipped: false,
        });
        self.values[var] = OptBool::from(value);
        self.num_assigned += 1;
        self.trail.push(var);
    }

    /// Backtracks to the deepest decision level that hasn't been fully explored.
    ///
    /// 1. Undoes all propagations made after that level's decision.
    /// 2. If the decision's second polarity is untried, flips the decision
    ///    variable in place and returns `(var, new_value)`.
    /// 3. Otherwise both polarities are exhausted: the level is discarded and
    ///    the next higher level is considered.
    ///
    /// Returns `None` once no decision is left to flip (search exhausted).
    pub fn backtrack(&mut self) -> Option<(VariableId, bool)> {
        while let Some(level) = self.levels.last().copied() {
            // Undo everything assigned after the decision variable of this level.
            while self.trail.len() > level.trail_mark + 1 {
                let var = self.trail.pop().expect("trail shorter than its marks");
                self.values[var] = OptBool::Unassigned;
                self.num_assigned -= 1;
            }

            let var = self.trail[level.trail_mark];
            if !level.flipped {
                if let Some(top) = self.levels.last_mut() {
                    top.flipped = true;
                }
                let value = self.values[var].is_false();
                self.values[var] = OptBool::from(value);
                return Some((var, value));
            }

            self.values[var] = OptBool::Unassigned;
            self.num_assigned -= 1;
            self.trail.pop();
            self.levels.pop();
        }
        None
    }
}
