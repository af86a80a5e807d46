use crate::substitution::BtSubst;
use crate::term::Term;

/// Try to extend subst into a match of matcher onto target, i.e. a
/// substitution sigma with sigma(matcher) == target. The target is
/// never instantiated. On success the new bindings persist in subst;
/// on failure subst is backtracked to its prior state.
pub fn match_terms(matcher: &Term, target: &Term, subst: &mut BtSubst) -> bool {
    let bt_state = subst.state();
    let result = match matcher {
        Term::Var(x) => {
            if subst.is_bound(x) {
                // The variable must already be bound to exactly the target.
                &subst.value(x) == target
            } else {
                subst.add_binding(x, target.clone());
                true
            }
        }
        Term::App(func, args) => match target {
            Term::Var(_) => false,
            Term::App(target_func, target_args) => {
                func == target_func
                    && args.len() == target_args.len()
                    && args
                        .iter()
                        .zip(target_args.iter())
                        .all(|(s, t)| match_terms(s, t, subst))
            }
        },
    };
    if !result {
        subst.backtrack_to_state(bt_state);
    }
    result
}
