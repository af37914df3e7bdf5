use std::fmt::Display;

/// A boolean formula over integer variables.
///
/// Variables are non-null integers (the ones used by SAT solvers).
/// Formulas should be built using the associated functions ([`Formula::and`], [`Formula::or`], ...),
/// which apply the following simplifications:
///
/// * constants are propagated (`And(x, false)` is `false`, `Or(x, true)` is `true`, ...);
/// * an empty conjunction is `true`, an empty disjunction is `false`;
/// * a conjunction (resp. disjunction) with a single operand is replaced by this operand;
/// * nested conjunctions (resp. disjunctions) are flattened;
/// * negations are pushed into literals and double negations are removed.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Formula {
    /// A constant.
    Const(bool),
    /// A variable, with a polarity (`false` for its negation).
    Literal(usize, bool),
    /// The negation of a formula.
    Not(Box<Formula>),
    /// The conjunction of formulas.
    And(Vec<Formula>),
    /// The disjunction of formulas.
    Or(Vec<Formula>),
    /// An implication.
    Implies(Box<Formula>, Box<Formula>),
}

impl Formula {
    /// The formula that is always true.
    pub const TRUE: Formula = Formula::Const(true);

    /// The formula that is always false.
    pub const FALSE: Formula = Formula::Const(false);

    /// Builds the positive literal of a variable.
    ///
    /// # Panics
    ///
    /// Panics if the variable is `0`.
    pub fn var(v: usize) -> Self {
        if v == 0 {
            panic!("cannot build a literal from the null variable")
        }
        Formula::Literal(v, true)
    }

    /// Builds the conjunction of formulas.
    ///
    /// ```
    /// # use koala::formula::Formula;
    /// assert_eq!(Formula::TRUE, Formula::and(vec![]));
    /// assert_eq!(Formula::var(1), Formula::and(vec![Formula::var(1), Formula::TRUE]));
    /// assert_eq!(Formula::FALSE, Formula::and(vec![Formula::var(1), Formula::FALSE]));
    /// ```
    pub fn and<I>(operands: I) -> Self
    where
        I: IntoIterator<Item = Formula>,
    {
        let mut flat = Vec::new();
        for op in operands {
            match op {
                Formula::Const(true) => {}
                Formula::Const(false) => return Formula::FALSE,
                Formula::And(mut children) => flat.append(&mut children),
                _ => flat.push(op),
            }
        }
        match flat.len() {
            0 => Formula::TRUE,
            1 => flat.pop().unwrap(),
            _ => Formula::And(flat),
        }
    }

    /// Builds the disjunction of formulas.
    ///
    /// ```
    /// # use koala::formula::Formula;
    /// assert_eq!(Formula::FALSE, Formula::or(vec![]));
    /// assert_eq!(Formula::var(1), Formula::or(vec![Formula::var(1), Formula::FALSE]));
    /// assert_eq!(Formula::TRUE, Formula::or(vec![Formula::var(1), Formula::TRUE]));
    /// ```
    pub fn or<I>(operands: I) -> Self
    where
        I: IntoIterator<Item = Formula>,
    {
        let mut flat = Vec::new();
        for op in operands {
            match op {
                Formula::Const(false) => {}
                Formula::Const(true) => return Formula::TRUE,
                Formula::Or(mut children) => flat.append(&mut children),
                _ => flat.push(op),
            }
        }
        match flat.len() {
            0 => Formula::FALSE,
            1 => flat.pop().unwrap(),
            _ => Formula::Or(flat),
        }
    }

    /// Builds the negation of a formula.
    #[allow(clippy::should_implement_trait)]
    pub fn not(formula: Formula) -> Self {
        match formula {
            Formula::Const(b) => Formula::Const(!b),
            Formula::Literal(v, polarity) => Formula::Literal(v, !polarity),
            Formula::Not(f) => *f,
            f => Formula::Not(Box::new(f)),
        }
    }

    /// Builds the implication `premise -> conclusion`.
    pub fn implies(premise: Formula, conclusion: Formula) -> Self {
        match (premise, conclusion) {
            (Formula::Const(false), _) | (_, Formula::Const(true)) => Formula::TRUE,
            (Formula::Const(true), c) => c,
            (p, Formula::Const(false)) => Formula::not(p),
            (p, c) => Formula::Implies(Box::new(p), Box::new(c)),
        }
    }

    /// Returns `true` iff this formula is the constant `true`.
    pub fn is_true(&self) -> bool {
        matches!(self, Formula::Const(true))
    }

    /// Returns `true` iff this formula is the constant `false`.
    pub fn is_false(&self) -> bool {
        matches!(self, Formula::Const(false))
    }

    /// Evaluates this formula given the values of the variables.
    pub fn eval(&self, valuation: &dyn Fn(usize) -> bool) -> bool {
        match self {
            Formula::Const(b) => *b,
            Formula::Literal(v, polarity) => valuation(*v) == *polarity,
            Formula::Not(f) => !f.eval(valuation),
            Formula::And(children) => children.iter().all(|c| c.eval(valuation)),
            Formula::Or(children) => children.iter().any(|c| c.eval(valuation)),
            Formula::Implies(p, c) => !p.eval(valuation) || c.eval(valuation),
        }
    }

    /// Returns the number of nodes of this formula.
    pub fn size(&self) -> usize {
        match self {
            Formula::Const(_) | Formula::Literal(_, _) => 1,
            Formula::Not(f) => 1 + f.size(),
            Formula::And(children) | Formula::Or(children) => {
                1 + children.iter().map(|c| c.size()).sum::<usize>()
            }
            Formula::Implies(p, c) => 1 + p.size() + c.size(),
        }
    }

    /// Returns the highest variable involved in this formula, or `0` if there is none.
    pub fn max_var(&self) -> usize {
        match self {
            Formula::Const(_) => 0,
            Formula::Literal(v, _) => *v,
            Formula::Not(f) => f.max_var(),
            Formula::And(children) | Formula::Or(children) => {
                children.iter().map(|c| c.max_var()).max().unwrap_or(0)
            }
            Formula::Implies(p, c) => usize::max(p.max_var(), c.max_var()),
        }
    }
}

impl Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn write_list(
            f: &mut std::fmt::Formatter<'_>,
            name: &str,
            children: &[Formula],
        ) -> std::fmt::Result {
            write!(f, "{}(", name)?;
            for (i, c) in children.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", c)?;
            }
            write!(f, ")")
        }
        match self {
            Formula::Const(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            Formula::Literal(v, true) => write!(f, "A_{}", v),
            Formula::Literal(v, false) => write!(f, "Not(A_{})", v),
            Formula::Not(g) => write!(f, "Not({})", g),
            Formula::And(children) => write_list(f, "And", children),
            Formula::Or(children) => write_list(f, "Or", children),
            Formula::Implies(p, c) => write!(f, "Implies({}, {})", p, c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_and_flattening() {
        let f = Formula::and(vec![
            Formula::and(vec![Formula::var(1), Formula::var(2)]),
            Formula::var(3),
        ]);
        assert_eq!(
            Formula::And(vec![Formula::var(1), Formula::var(2), Formula::var(3)]),
            f
        );
    }

    #[test]
    fn test_or_flattening() {
        let f = Formula::or(vec![
            Formula::var(1),
            Formula::or(vec![Formula::var(2), Formula::var(3)]),
        ]);
        assert_eq!(
            Formula::Or(vec![Formula::var(1), Formula::var(2), Formula::var(3)]),
            f
        );
    }

    #[test]
    fn test_not() {
        assert_eq!(Formula::Literal(1, false), Formula::not(Formula::var(1)));
        assert_eq!(Formula::FALSE, Formula::not(Formula::TRUE));
        let conj = Formula::and(vec![Formula::var(1), Formula::var(2)]);
        assert_eq!(conj, Formula::not(Formula::not(conj.clone())));
    }

    #[test]
    fn test_implies() {
        assert_eq!(Formula::TRUE, Formula::implies(Formula::FALSE, Formula::var(1)));
        assert_eq!(Formula::TRUE, Formula::implies(Formula::var(1), Formula::TRUE));
        assert_eq!(Formula::var(2), Formula::implies(Formula::TRUE, Formula::var(2)));
        assert_eq!(
            Formula::Literal(1, false),
            Formula::implies(Formula::var(1), Formula::FALSE)
        );
    }

    #[test]
    fn test_eval() {
        let f = Formula::implies(
            Formula::var(1),
            Formula::or(vec![Formula::var(2), Formula::not(Formula::var(3))]),
        );
        assert!(f.eval(&|_| false));
        assert!(!f.eval(&|v| v != 2));
        assert!(f.eval(&|v| v == 1));
    }

    #[test]
    fn test_size_and_max_var() {
        let f = Formula::and(vec![
            Formula::var(4),
            Formula::or(vec![Formula::var(2), Formula::var(7)]),
        ]);
        assert_eq!(5, f.size());
        assert_eq!(7, f.max_var());
        assert_eq!(0, Formula::TRUE.max_var());
    }

    #[test]
    fn test_display() {
        let f = Formula::and(vec![
            Formula::var(1),
            Formula::implies(Formula::var(2), Formula::not(Formula::var(3))),
        ]);
        assert_eq!("And(A_1, Implies(A_2, Not(A_3)))", f.to_string());
    }

    #[test]
    #[should_panic(expected = "cannot build a literal from the null variable")]
    fn test_null_var() {
        Formula::var(0);
    } // kcov-ignore
}
