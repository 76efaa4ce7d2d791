/*
    Nyx, blazing fast astrodynamics
    Copyright (C) 2018-onwards Christopher Rabotin <christopher.rabotin@gmail.com>

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use crate::exposure::{ResolvedCall, ENVIRONMENT};
use crate::io::ConfigError;
use indexmap::IndexMap;
use pyo3::prelude::*;
use pyo3::types::{PyAny, PyDict, PyList, PyTuple};
use serde_yaml::{Mapping, Value};

/// Try to convert the provided PyAny into a SerDe YAML Value
pub fn pyany_to_value(any: &PyAny) -> Result<Value, ConfigError> {
    if any.is_none() {
        Ok(Value::Null)
    } else if let Ok(as_bool) = any.extract::<bool>() {
        Ok(Value::Bool(as_bool))
    } else if let Ok(as_str) = any.extract::<String>() {
        Ok(Value::String(as_str))
    } else if let Ok(as_int) = any.extract::<i64>() {
        Ok(Value::Number(as_int.into()))
    } else if let Ok(as_f64) = any.extract::<f64>() {
        Ok(Value::Number(as_f64.into()))
    } else if let Ok(as_list) = any.downcast::<PyList>() {
        let mut seq = Vec::new();
        for item in as_list.iter() {
            seq.push(pyany_to_value(item)?);
        }
        Ok(Value::Sequence(seq))
    } else if let Ok(as_dict) = any.downcast::<PyDict>() {
        let mut map = Mapping::new();
        for (k, v) in as_dict.iter() {
            map.insert(pyany_to_value(k)?, pyany_to_value(v)?);
        }
        Ok(Value::Mapping(map))
    } else {
        Err(ConfigError::InvalidConfig {
            msg: "cannot convert input (not one of None, bool, int, float, str, List, Dict)"
                .to_string(),
        })
    }
}

/// Converts a SerDe YAML value into the equivalent Python object
pub fn value_to_py(py: Python<'_>, value: &Value) -> PyObject {
    match value {
        Value::Null => py.None(),
        Value::Bool(b) => b.to_object(py),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.into_py(py),
            (None, Some(f)) => f.into_py(py),
            (None, None) => py.None(),
        },
        Value::String(s) => s.to_object(py),
        Value::Sequence(seq) => seq
            .iter()
            .map(|item| value_to_py(py, item))
            .collect::<Vec<_>>()
            .into_py(py),
        Value::Mapping(map) => {
            let dict = PyDict::new(py);
            for (k, v) in map {
                // Keys which cannot be hashed by Python are skipped
                if dict.set_item(value_to_py(py, k), value_to_py(py, v)).is_err() {
                    warn!("skipping unhashable key {k:?}");
                }
            }
            dict.into_py(py)
        }
        Value::Tagged(tagged) => value_to_py(py, &tagged.value),
    }
}

/// Arguments of an embedding-side call, bound to their names with the registered defaults filled in
pub struct BoundCall {
    pub target: String,
    pub arguments: IndexMap<String, PyObject>,
}

impl BoundCall {
    /// Extracts the named argument, which is always present after binding
    pub fn extract<'py, T: FromPyObject<'py>>(&self, py: Python<'py>, name: &str) -> PyResult<T> {
        match self.arguments.get(name) {
            Some(obj) => obj.as_ref(py).extract(),
            None => Err(pyo3::exceptions::PyKeyError::new_err(name.to_string())),
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.arguments.contains_key(name)
    }
}

/// Binds a constructor call of an exposed class, or a method call when `method` is provided.
///
/// The registry only sees argument names, so the Python objects provided by the caller are passed through unchanged
/// and only omitted arguments are converted from their registered defaults.
pub fn bind_call(
    py: Python<'_>,
    capability: &str,
    method: Option<&str>,
    args: &PyTuple,
    kwargs: Option<&PyDict>,
) -> PyResult<BoundCall> {
    let positional = vec![Value::Null; args.len()];
    let mut keyword_names = Vec::new();
    if let Some(kwargs) = kwargs {
        for key in kwargs.keys() {
            keyword_names.push(key.extract::<String>()?);
        }
    }
    let keyword: Vec<(&str, Value)> = keyword_names
        .iter()
        .map(|name| (name.as_str(), Value::Null))
        .collect();

    let resolved: ResolvedCall = match method {
        Some(method) => ENVIRONMENT.resolve_arguments(capability, method, &positional, &keyword)?,
        None => ENVIRONMENT.resolve_constructor(capability, &positional, &keyword)?,
    };

    let mut arguments = IndexMap::with_capacity(resolved.arguments.len());
    for (index, (name, default)) in resolved.arguments.iter().enumerate() {
        let obj = if index < args.len() {
            args.get_item(index)?.into_py(py)
        } else {
            match kwargs.map(|kw| kw.get_item(name)).transpose()?.flatten() {
                Some(given) => given.into_py(py),
                None => value_to_py(py, default),
            }
        };
        arguments.insert(name.clone(), obj);
    }

    Ok(BoundCall {
        target: resolved.target,
        arguments,
    })
}
