use std::fmt;

use fxhash::FxHashMap;

/// The symbols of a problem: function symbols and predicate symbols,
/// each with an associated arity. Constants are functions of arity 0;
/// the equality predicate "=" has arity 2.
#[derive(Debug, Clone, Default)]
pub struct Signature {
    funs: FxHashMap<String, usize>,
    preds: FxHashMap<String, usize>,
}

impl Signature {
    pub fn new() -> Signature {
        Signature::default()
    }

    pub fn add_fun(&mut self, name: &str, arity: usize) {
        self.funs.insert(name.to_string(), arity);
    }

    pub fn add_pred(&mut self, name: &str, arity: usize) {
        self.preds.insert(name.to_string(), arity);
    }

    pub fn is_fun(&self, name: &str) -> bool {
        self.funs.contains_key(name)
    }

    pub fn is_pred(&self, name: &str) -> bool {
        self.preds.contains_key(name)
    }

    pub fn is_constant(&self, name: &str) -> bool {
        self.funs.get(name) == Some(&0)
    }

    /// The arity of a known symbol. Function symbols shadow predicate
    /// symbols, mirroring how the arity is looked up during parsing.
    pub fn arity(&self, name: &str) -> Option<usize> {
        self.funs.get(name).or_else(|| self.preds.get(name)).copied()
    }

    /// Function symbols in a deterministic order.
    pub fn fun_symbols(&self) -> Vec<(String, usize)> {
        let mut res: Vec<_> = self
            .funs
            .iter()
            .map(|(name, arity)| (name.clone(), *arity))
            .collect();
        res.sort();
        res
    }

    /// Predicate symbols in a deterministic order.
    pub fn pred_symbols(&self) -> Vec<(String, usize)> {
        let mut res: Vec<_> = self
            .preds
            .iter()
            .map(|(name, arity)| (name.clone(), *arity))
            .collect();
        res.sort();
        res
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Predicates:\n-----------")?;
        for (name, arity) in self.pred_symbols() {
            writeln!(f, "{}: {}", name, arity)?;
        }
        writeln!(f, "Functions:\n-----------")?;
        for (name, arity) in self.fun_symbols() {
            writeln!(f, "{}: {}", name, arity)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature() {
        let mut sig = Signature::new();
        sig.add_fun("mult", 2);
        sig.add_fun("a", 0);
        sig.add_pred("weird", 4);

        assert!(sig.is_pred("weird"));
        assert!(!sig.is_pred("unknown"));
        assert!(!sig.is_pred("a"));
        assert!(sig.is_fun("a"));
        assert!(!sig.is_fun("unknown"));
        assert!(!sig.is_fun("weird"));

        assert_eq!(sig.arity("mult"), Some(2));
        assert_eq!(sig.arity("weird"), Some(4));
        assert!(sig.is_constant("a"));
        assert!(!sig.is_constant("mult"));
    }
}
