//! Builtin helper constructibles.
//!
//! References are only substituted at the top level of `args`/`kwds`, so a
//! list argument such as `[spoke0, spoke1]` reaches its constructor as a
//! list of strings. The helpers here close that gap: give each element as
//! its own positional (or keyword) argument to `to_list` (or `to_dict`) and
//! reference the result instead.
//!
//! ```yaml
//! spoke_list:
//!   factory: builtins.to_list
//!   args: [spoke0, spoke1, spoke2, spoke3]
//! wheel:
//!   module: vehicles
//!   class: Wheel
//!   args: [rim, hub, spoke_list]
//! ```
//!
//! Every helper is registered under both `builtins` and
//! `device_spinner.builtins`.
//!
//! | name      | produces                       | from                                  |
//! |-----------|--------------------------------|---------------------------------------|
//! | `to_list` | `Vec<Argument>`                | all positional arguments              |
//! | `to_dict` | `BTreeMap<String, Argument>`   | all keyword arguments                 |
//! | `list`    | `Vec<Argument>`                | one optional sequence literal         |
//! | `dict`    | `BTreeMap<String, Argument>`   | optional mapping literal, then kwds   |
//! | `str`     | `String`                       | one optional argument                 |

use std::collections::BTreeMap;

use crate::core::{Argument, ArgumentError, Arguments, DynError};
use crate::locator::{BUILTIN_MODULES, Registry};
use crate::spec::Value;

/// Register all builtins into `registry`.
pub fn register(registry: &mut Registry) {
    for module in BUILTIN_MODULES {
        registry
            .register(module, "to_list", to_list)
            .register(module, "to_dict", to_dict)
            .register(module, "list", list)
            .register(module, "dict", dict)
            .register(module, "str", str);
    }
}

/// Collect positional arguments, instances included, into a list.
pub fn to_list(args: Arguments) -> Result<Vec<Argument>, DynError> {
    reject_kwds("to_list", &args)?;
    Ok(args.args)
}

/// Collect keyword arguments, instances included, into a mapping.
pub fn to_dict(args: Arguments) -> Result<BTreeMap<String, Argument>, DynError> {
    if !args.args.is_empty() {
        return Err(format!("to_dict takes no positional arguments, got {}", args.args.len()).into());
    }
    Ok(args.kwds)
}

/// Turn an optional sequence literal into a list of literal arguments.
pub fn list(args: Arguments) -> Result<Vec<Argument>, DynError> {
    reject_kwds("list", &args)?;
    match args.args.as_slice() {
        [] => Ok(Vec::new()),
        [Argument::Literal(Value::Seq(items))] => {
            Ok(items.iter().cloned().map(Argument::Literal).collect())
        }
        [other] => Err(ArgumentError::WrongType {
            expected: "a sequence",
            actual: describe(other),
        }
        .into()),
        more => Err(format!("list takes at most 1 positional argument, got {}", more.len()).into()),
    }
}

/// Build a mapping from an optional mapping literal plus keyword arguments.
///
/// Keyword arguments win over entries of the positional mapping.
pub fn dict(args: Arguments) -> Result<BTreeMap<String, Argument>, DynError> {
    let mut map = match args.args.as_slice() {
        [] => BTreeMap::new(),
        [Argument::Literal(Value::Map(entries))] => entries
            .iter()
            .map(|(key, value)| (key.clone(), Argument::Literal(value.clone())))
            .collect(),
        [other] => {
            return Err(ArgumentError::WrongType {
                expected: "a mapping",
                actual: describe(other),
            }
            .into());
        }
        more => {
            return Err(format!("dict takes at most 1 positional argument, got {}", more.len()).into());
        }
    };
    map.extend(args.kwds);
    Ok(map)
}

/// Render one optional argument as a string.
///
/// A string literal is returned as is, other literals as compact JSON.
pub fn str(args: Arguments) -> Result<String, DynError> {
    reject_kwds("str", &args)?;
    match args.args.as_slice() {
        [] => Ok(String::new()),
        [Argument::Literal(Value::Str(text))] => Ok(text.clone()),
        [other] => Ok(other.to_string()),
        more => Err(format!("str takes at most 1 positional argument, got {}", more.len()).into()),
    }
}

fn reject_kwds(name: &str, args: &Arguments) -> Result<(), DynError> {
    match args.kwds.keys().next() {
        Some(key) => Err(format!("{name} got an unexpected keyword argument '{key}'").into()),
        None => Ok(()),
    }
}

fn describe(argument: &Argument) -> String {
    match argument {
        Argument::Literal(value) => value.kind().to_string(),
        Argument::Instance(instance) => format!("instance of {}", instance.type_name()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Instance;

    fn literals(values: Vec<Value>) -> Arguments {
        Arguments::new(values.into_iter().map(Argument::Literal).collect(), BTreeMap::new())
    }

    #[test]
    fn test_to_list_keeps_instances() {
        let spoke = Instance::new(3_u8);
        let args = Arguments::new(
            vec![Argument::Instance(spoke.clone()), Argument::Literal(Value::Int(1))],
            BTreeMap::new(),
        );

        let list = to_list(args).unwrap();
        assert_eq!(list.len(), 2);
        assert!(list[0].as_instance().unwrap().ptr_eq(&spoke));
        assert_eq!(list[1].as_literal(), Some(&Value::Int(1)));
    }

    #[test]
    fn test_to_list_rejects_kwds() {
        let mut kwds = BTreeMap::new();
        kwds.insert("a".to_string(), Argument::Literal(Value::Null));
        let err = to_list(Arguments::new(Vec::new(), kwds)).unwrap_err();
        assert!(err.to_string().contains("unexpected keyword argument 'a'"));
    }

    #[test]
    fn test_to_dict() {
        let mut kwds = BTreeMap::new();
        kwds.insert("key0".to_string(), Argument::Literal(Value::from("my_val")));
        let map = to_dict(Arguments::new(Vec::new(), kwds)).unwrap();
        assert_eq!(map["key0"].as_literal(), Some(&Value::from("my_val")));

        assert!(to_dict(literals(vec![Value::Int(1)])).is_err());
    }

    #[test]
    fn test_list_and_dict_from_literals() {
        let items = list(literals(vec![Value::from(vec![0, 1, 2])])).unwrap();
        assert_eq!(items.len(), 3);
        assert!(list(literals(vec![Value::Int(0)])).is_err());
        assert!(list(Arguments::default()).unwrap().is_empty());

        let mut base = BTreeMap::new();
        base.insert("a".to_string(), Value::Int(0));
        base.insert("b".to_string(), Value::Int(1));
        let mut kwds = BTreeMap::new();
        kwds.insert("b".to_string(), Argument::Literal(Value::Int(10)));
        let map = dict(Arguments::new(vec![Argument::Literal(Value::Map(base))], kwds)).unwrap();
        assert_eq!(map["a"].as_literal(), Some(&Value::Int(0)));
        assert_eq!(map["b"].as_literal(), Some(&Value::Int(10)));
    }

    #[test]
    fn test_str() {
        assert_eq!(str(literals(vec![Value::from("my_val")])).unwrap(), "my_val");
        assert_eq!(str(literals(vec![Value::Int(5)])).unwrap(), "5");
        assert_eq!(str(Arguments::default()).unwrap(), "");
        assert!(str(literals(vec![Value::Null, Value::Null])).is_err());
    }
}
