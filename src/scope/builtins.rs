//! Built-in global names
//!
//! Registered in the root scope when a rule asks for built-in awareness.

/// ECMAScript globals, common host globals and a few DOM/lib names
pub const BUILTIN_GLOBALS: &[&str] = &[
    "Array",
    "ArrayBuffer",
    "Atomics",
    "BigInt",
    "BigInt64Array",
    "BigUint64Array",
    "Boolean",
    "DataView",
    "Date",
    "Error",
    "EvalError",
    "Float32Array",
    "Float64Array",
    "Function",
    "Infinity",
    "Int16Array",
    "Int32Array",
    "Int8Array",
    "Intl",
    "JSON",
    "Map",
    "Math",
    "NaN",
    "NodeListOf",
    "Number",
    "Object",
    "Promise",
    "Proxy",
    "RangeError",
    "ReferenceError",
    "Reflect",
    "RegExp",
    "Set",
    "SharedArrayBuffer",
    "String",
    "Symbol",
    "SyntaxError",
    "TypeError",
    "URIError",
    "Uint16Array",
    "Uint32Array",
    "Uint8Array",
    "Uint8ClampedArray",
    "WeakMap",
    "WeakSet",
    "console",
    "decodeURI",
    "decodeURIComponent",
    "document",
    "encodeURI",
    "encodeURIComponent",
    "escape",
    "eval",
    "global",
    "globalThis",
    "isFinite",
    "isNaN",
    "parseFloat",
    "parseInt",
    "self",
    "top",
    "undefined",
    "unescape",
    "window",
];

pub fn is_builtin_global(name: &str) -> bool {
    BUILTIN_GLOBALS.binary_search(&name).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_is_sorted_for_lookup() {
        let mut sorted = BUILTIN_GLOBALS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, BUILTIN_GLOBALS);
    }

    #[test]
    fn test_lookup() {
        assert!(is_builtin_global("Object"));
        assert!(is_builtin_global("window"));
        assert!(!is_builtin_global("myGlobal"));
    }
}
