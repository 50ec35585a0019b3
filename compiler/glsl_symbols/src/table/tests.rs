use super::*;
use glsl_ir::{FunctionId, StringInterner, TypeId, VariableId};
use pretty_assertions::assert_eq;

type Table = SymbolTable<VariableId, TypeId, FunctionId>;

fn var(n: u32) -> VariableId {
    VariableId::new(n)
}

fn ty(n: u32) -> TypeId {
    TypeId::new(n)
}

fn func(n: u32) -> FunctionId {
    FunctionId::new(n)
}

#[test]
fn test_new_table_is_empty_at_depth_zero() {
    let interner = StringInterner::new();
    let table = Table::new();

    assert_eq!(table.current_depth(), 0);
    assert!(table.is_empty());
    assert_eq!(table.get_variable(interner.intern("x")), None);
    assert!(!table.declared_in_current_scope(interner.intern("x")));
}

#[test]
fn test_redeclaration_in_same_scope_keeps_first() {
    let interner = StringInterner::new();
    let x = interner.intern("x");
    let mut table = Table::new();

    assert!(table.add_variable(x, var(1)));
    assert!(!table.add_variable(x, var(2)));
    assert_eq!(table.get_variable(x), Some(var(1)));
    assert_eq!(table.len(), 1);

    assert_eq!(
        table.try_add(x, Symbol::Variable(var(3))),
        Err(SymbolError::Redeclaration {
            namespace: NameSpace::Variable,
            name: x,
            depth: 0,
        })
    );
    assert_eq!(table.get_variable(x), Some(var(1)));
}

#[test]
fn test_same_name_in_each_namespace() {
    let interner = StringInterner::new();
    let light = interner.intern("Light");
    let mut table = Table::new();

    assert!(table.add_type(light, ty(1)));
    assert!(table.add_variable(light, var(1)));
    assert!(table.add_function(light, func(1)));

    assert_eq!(table.get(NameSpace::Type, light), Some(Symbol::Type(ty(1))));
    assert_eq!(
        table.get(NameSpace::Variable, light),
        Some(Symbol::Variable(var(1)))
    );
    assert_eq!(
        table.get(NameSpace::Function, light),
        Some(Symbol::Function(func(1)))
    );
    assert_eq!(table.len(), 3);
}

#[test]
fn test_shadowing_and_restore_on_pop() {
    let interner = StringInterner::new();
    let x = interner.intern("x");
    let mut table = Table::new();

    assert!(table.add_variable(x, var(0)));
    table.push_scope();
    assert!(table.add_variable(x, var(1)));
    assert_eq!(table.get_variable(x), Some(var(1)));
    assert_eq!(table.scope_of(NameSpace::Variable, x), Some(1));

    assert_eq!(table.pop_scope(), Ok(()));
    assert_eq!(table.get_variable(x), Some(var(0)));
    assert_eq!(table.scope_of(NameSpace::Variable, x), Some(0));
}

#[test]
fn test_outer_declaration_visible_in_inner_scopes() {
    let interner = StringInterner::new();
    let color = interner.intern("color");
    let mut table = Table::new();

    assert!(table.add_variable(color, var(7)));
    table.push_scope();
    table.push_scope();
    assert_eq!(table.get_variable(color), Some(var(7)));
    assert_eq!(table.scope_of(NameSpace::Variable, color), Some(0));
    assert!(!table.declared_in_current_scope(color));
}

#[test]
fn test_declared_in_current_scope_tracks_frame() {
    let interner = StringInterner::new();
    let i = interner.intern("i");
    let mut table = Table::new();

    assert!(table.add_variable(i, var(0)));
    assert!(table.declared_in_current_scope(i));

    table.push_scope();
    assert!(!table.declared_in_current_scope(i));
    assert!(table.add_variable(i, var(1)));
    assert!(table.declared_in_current_scope(i));

    assert_eq!(table.pop_scope(), Ok(()));
    // Still declared at depth 0, which is current again.
    assert!(table.declared_in_current_scope(i));

    table.push_scope();
    assert!(table.add_variable(interner.intern("j"), var(2)));
    assert_eq!(table.pop_scope(), Ok(()));
    assert!(!table.declared_in_current_scope(interner.intern("j")));
}

#[test]
fn test_declared_in_current_scope_in_filters_namespaces() {
    let interner = StringInterner::new();
    let foo = interner.intern("foo");
    let mut table = Table::new();

    table.push_scope();
    assert!(table.add_function(foo, func(1)));

    assert!(table.declared_in_current_scope(foo));
    assert!(table.declared_in_current_scope_in(NameSpaceSet::FUNCTION, foo));
    assert!(!table.declared_in_current_scope_in(
        NameSpaceSet::VARIABLE | NameSpaceSet::TYPE,
        foo
    ));
    assert!(!table.declared_in_current_scope_in(NameSpaceSet::empty(), foo));
}

#[test]
fn test_pop_outermost_is_underflow() {
    let interner = StringInterner::new();
    let x = interner.intern("x");
    let mut table = Table::new();
    assert!(table.add_variable(x, var(0)));

    let err = table.pop_scope();
    assert_eq!(err, Err(SymbolError::ScopeUnderflow));
    assert!(err.is_err_and(|e| e.is_internal()));

    assert_eq!(table.current_depth(), 0);
    assert_eq!(table.get_variable(x), Some(var(0)));
}

#[test]
fn test_pop_hides_every_namespace_of_the_frame() {
    let interner = StringInterner::new();
    let a = interner.intern("a");
    let b = interner.intern("b");
    let mut table = Table::new();

    assert!(table.add_type(a, ty(0)));
    table.push_scope();
    assert!(table.add_variable(a, var(1)));
    assert!(table.add_type(b, ty(1)));
    assert!(table.add_function(b, func(1)));
    assert_eq!(table.len(), 4);

    assert_eq!(table.pop_scope(), Ok(()));
    assert_eq!(table.get_variable(a), None);
    assert_eq!(table.get_type(b), None);
    assert_eq!(table.get_function(b), None);
    assert_eq!(table.get_type(a), Some(ty(0)));
    assert_eq!(table.len(), 1);
}

#[test]
fn test_type_and_variable_share_name_across_scopes() {
    let interner = StringInterner::new();
    let foo = interner.intern("Foo");
    let mut table = Table::new();

    assert!(table.add(foo, Symbol::Type(ty(1))));
    table.push_scope();
    assert!(table.add(foo, Symbol::Variable(var(1))));
    assert_eq!(table.get(NameSpace::Type, foo), Some(Symbol::Type(ty(1))));
    assert_eq!(
        table.get(NameSpace::Variable, foo),
        Some(Symbol::Variable(var(1)))
    );
    assert_eq!(table.pop_scope(), Ok(()));
    assert_eq!(table.get(NameSpace::Variable, foo), None);
    assert_eq!(table.get(NameSpace::Type, foo), Some(Symbol::Type(ty(1))));
}

#[test]
fn test_add_global_from_nested_scope() {
    let interner = StringInterner::new();
    let texture = interner.intern("texture2D");
    let mut table = Table::new();

    table.push_scope();
    table.push_scope();
    assert!(table.add_global(texture, Symbol::Function(func(9))));
    assert!(!table.declared_in_current_scope(texture));
    assert_eq!(table.scope_of(NameSpace::Function, texture), Some(0));

    // A second global declaration of the same function is a redeclaration.
    assert_eq!(
        table.try_add_global(texture, Symbol::Function(func(10))),
        Err(SymbolError::Redeclaration {
            namespace: NameSpace::Function,
            name: texture,
            depth: 0,
        })
    );

    assert_eq!(table.pop_scope(), Ok(()));
    assert_eq!(table.pop_scope(), Ok(()));
    assert_eq!(table.get_function(texture), Some(func(9)));
    assert!(table.declared_in_current_scope(texture));
}

#[test]
fn test_add_global_stays_beneath_inner_shadow() {
    let interner = StringInterner::new();
    let n = interner.intern("n");
    let mut table = Table::new();

    table.push_scope();
    assert!(table.add_variable(n, var(1)));
    assert!(table.add_global(n, Symbol::Variable(var(0))));

    // The inner declaration still wins while its scope is live.
    assert_eq!(table.get_variable(n), Some(var(1)));
    assert_eq!(table.pop_scope(), Ok(()));
    assert_eq!(table.get_variable(n), Some(var(0)));

    // And the global now blocks a same-scope redeclaration at depth 0.
    assert!(!table.add_variable(n, var(2)));
}

#[test]
fn test_current_scope_symbols_in_declaration_order() {
    let interner = StringInterner::new();
    let a = interner.intern("a");
    let b = interner.intern("b");
    let c = interner.intern("c");
    let mut table = Table::new();

    assert!(table.add_variable(a, var(0)));
    table.push_scope();
    assert!(table.add_type(b, ty(1)));
    assert!(table.add_variable(a, var(1)));
    assert!(!table.add_variable(a, var(2)));
    assert!(table.add_function(c, func(1)));

    let symbols: Vec<_> = table
        .current_scope_symbols()
        .map(|entry| (entry.name, entry.payload, entry.depth))
        .collect();
    assert_eq!(
        symbols,
        vec![
            (b, Symbol::Type(ty(1)), 1),
            (a, Symbol::Variable(var(1)), 1),
            (c, Symbol::Function(func(1)), 1),
        ]
    );
}

#[test]
fn test_lookup_reports_entry() {
    let interner = StringInterner::new();
    let pos = interner.intern("pos");
    let mut table = Table::with_capacity(16);

    table.push_scope();
    assert!(table.add_variable(pos, var(4)));
    assert_eq!(
        table.lookup(NameSpace::Variable, pos),
        Some(SymbolEntry {
            name: pos,
            namespace: NameSpace::Variable,
            payload: Symbol::Variable(var(4)),
            depth: 1,
        })
    );
    assert_eq!(table.lookup(NameSpace::Type, pos), None);
}

#[test]
fn test_redeclaration_message() {
    let interner = StringInterner::new();
    let x = interner.intern("x");
    let mut table = Table::new();
    assert!(table.add_variable(x, var(0)));

    let err = table.try_add(x, Symbol::Variable(var(1)));
    assert_eq!(
        err.map_err(|e| e.describe(&interner)),
        Err("variable `x` is already declared in this scope".to_string())
    );
    assert_eq!(
        SymbolError::ScopeUnderflow.to_string(),
        "scope underflow: cannot pop the outermost scope"
    );
}

// === Property tests ===

mod proptest_model {
    use super::super::SymbolTable;
    use crate::{NameSpace, Symbol};
    use glsl_ir::{Name, StringInterner};
    use proptest::prelude::*;

    type IntTable = SymbolTable<u32, u32, u32>;

    #[derive(Clone, Debug)]
    enum Op {
        Push,
        Pop,
        Add { ns: usize, name: usize, payload: u32 },
        AddGlobal { ns: usize, name: usize, payload: u32 },
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            2 => Just(Op::Push),
            2 => Just(Op::Pop),
            5 => (0usize..3, 0usize..4, any::<u32>())
                .prop_map(|(ns, name, payload)| Op::Add { ns, name, payload }),
            1 => (0usize..3, 0usize..4, any::<u32>())
                .prop_map(|(ns, name, payload)| Op::AddGlobal { ns, name, payload }),
        ]
    }

    fn symbol(ns: NameSpace, payload: u32) -> Symbol<u32, u32, u32> {
        match ns {
            NameSpace::Variable => Symbol::Variable(payload),
            NameSpace::Type => Symbol::Type(payload),
            NameSpace::Function => Symbol::Function(payload),
        }
    }

    /// Naive list-of-frames table, scanned innermost first on every lookup.
    struct Model {
        frames: Vec<Vec<(NameSpace, Name, u32)>>,
    }

    impl Model {
        fn add(&mut self, frame: usize, ns: NameSpace, name: Name, payload: u32) -> bool {
            let frame = &mut self.frames[frame];
            if frame.iter().any(|&(n, m, _)| n == ns && m == name) {
                return false;
            }
            frame.push((ns, name, payload));
            true
        }

        fn get(&self, ns: NameSpace, name: Name) -> Option<u32> {
            self.frames.iter().rev().find_map(|frame| {
                frame
                    .iter()
                    .find(|&&(n, m, _)| n == ns && m == name)
                    .map(|&(_, _, payload)| payload)
            })
        }

        fn declared_here(&self, name: Name) -> bool {
            self.frames
                .last()
                .is_some_and(|frame| frame.iter().any(|&(_, m, _)| m == name))
        }
    }

    proptest! {
        #[test]
        fn table_matches_naive_model(ops in proptest::collection::vec(op(), 0..64)) {
            let interner = StringInterner::new();
            let names: Vec<Name> =
                ["a", "b", "c", "d"].iter().map(|s| interner.intern(s)).collect();

            let mut table = IntTable::new();
            let mut model = Model { frames: vec![Vec::new()] };

            for op in ops {
                match op {
                    Op::Push => {
                        table.push_scope();
                        model.frames.push(Vec::new());
                    }
                    Op::Pop => {
                        let popped = table.pop_scope();
                        if model.frames.len() == 1 {
                            prop_assert!(popped.is_err());
                        } else {
                            prop_assert!(popped.is_ok());
                            model.frames.pop();
                        }
                    }
                    Op::Add { ns, name, payload } => {
                        let ns = NameSpace::ALL[ns];
                        let name = names[name];
                        let top = model.frames.len() - 1;
                        let expected = model.add(top, ns, name, payload);
                        prop_assert_eq!(table.add(name, symbol(ns, payload)), expected);
                    }
                    Op::AddGlobal { ns, name, payload } => {
                        let ns = NameSpace::ALL[ns];
                        let name = names[name];
                        let expected = model.add(0, ns, name, payload);
                        prop_assert_eq!(table.add_global(name, symbol(ns, payload)), expected);
                    }
                }

                let depth = u32::try_from(model.frames.len() - 1).unwrap_or(u32::MAX);
                prop_assert_eq!(table.current_depth(), depth);
                prop_assert_eq!(table.len(), model.frames.iter().map(Vec::len).sum::<usize>());
                for &name in &names {
                    prop_assert_eq!(
                        table.declared_in_current_scope(name),
                        model.declared_here(name)
                    );
                    for ns in NameSpace::ALL {
                        prop_assert_eq!(
                            table.get(ns, name),
                            model.get(ns, name).map(|payload| symbol(ns, payload))
                        );
                    }
                }
            }
        }
    }
}
