//! Header lookups for `Standard` imports. A function declared `-> 'Standard
//! C' puts.` never gets a forward declaration in the program stream —
//! instead its header is added to the imports file and the lovela-style
//! wrapper calls straight through to the libc symbol.

/// Header for a `Standard C` import, if this crate knows the symbol.
pub fn c_header(function: &str) -> Option<&'static str> {
    match function {
        "puts" | "printf" | "fprintf" | "sprintf" | "scanf" | "fopen" | "fclose" | "fread" | "fwrite" => {
            Some("stdio.h")
        }
        "malloc" | "calloc" | "realloc" | "free" | "exit" | "atoi" | "atof" | "rand" | "srand" => Some("stdlib.h"),
        "strlen" | "strcpy" | "strcmp" | "strcat" | "memcpy" | "memset" | "memmove" => Some("string.h"),
        "sin" | "cos" | "tan" | "sqrt" | "pow" | "floor" | "ceil" | "fabs" => Some("math.h"),
        _ => None,
    }
}

/// Header for a `Standard C++` import.
pub fn cpp_header(function: &str) -> Option<&'static str> {
    match function {
        "cout" | "cin" | "endl" => Some("iostream"),
        "string" => Some("string"),
        "vector" => Some("vector"),
        "map" => Some("map"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn puts_maps_to_stdio() {
        assert_eq!(c_header("puts"), Some("stdio.h"));
    }

    #[test]
    fn unknown_symbol_has_no_header() {
        assert_eq!(c_header("frobnicate"), None);
    }
}
