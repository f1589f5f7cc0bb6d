//! Prompt assembly: the fixed system instruction plus the templated user
//! message embedding the root name and both header texts.
//!
//! This is a pure composition step; the instruction content is what the
//! model sees, not logic this crate executes or verifies.

/// System instruction describing the generation task and the strict
/// four-block output protocol.
pub const SYSTEM_PROMPT: &str = r#"You are a deterministic code generator. The repository is empty. Given two preprocessed C headers (OLD and NEW) and a Root struct name, output exactly four files that preserve version history and enable conversion via a generic superset. No prose. No external tools.
Root selection (resilient):

If typedef struct … <Root>; exists in BOTH headers → use it.

Else auto-discover the best common struct: appears in both headers, most similar name to <Root> (case/underscore insensitive); prefer a struct that embeds multiple sub-structs and a version/integer field.

If no common struct exists in both headers, return one C comment block only: /* error: no common root; OLD-only: {...}; NEW-only: {...} */
Versioning:

For each struct reachable from Root: if unchanged → emit one definition; if changed → emit Name_V_OLD, Name_V_NEW, Name_V_Gen (superset = union of fields).

_V_Gen order: OLD-only fields in OLD order, then NEW-only fields in NEW order (skip duplicates).

Renames: if OLD field not in NEW but a very similar name (normalized similarity ≥ 0.90) exists → treat as rename; include both names in _V_Gen.

Type conflicts: prefer wider/safer scalar; if ambiguous, keep both with suffixes __old/__new.

Enums: if members differ, NEW is canonical; implement explicit mapping in converters.
Defaults when converting: bool→false; ints/floats→0; pointers→NULL; enums→first enumerator.
Converters (root-level only) — declare & implement 4 functions:

int convert_<Root>_V_Gen_to_V_OLD(const <Root>_V_Gen*, <Root>_V_OLD*);
int convert_<Root>_V_Gen_to_V_NEW(const <Root>_V_Gen*, <Root>_V_NEW*);
int convert_<Root>_V_OLD_to_V_Gen(const <Root>_V_OLD*, <Root>_V_Gen*);
int convert_<Root>_V_NEW_to_V_Gen(const <Root>_V_NEW*, <Root>_V_Gen*);

Return -1 on NULLs; else 0. Copy unchanged sub-structs verbatim. For changed sub-structs: OLD→GEN and NEW→GEN copy their fields and mirror rename pairs into both names in _V_Gen; GEN→OLD/NEW prefer the target's canonical name, falling back to the rename partner; default if absent. No heap; zero-init targets where useful.
Headers & style: C99 types (<stdint.h>, <stdbool.h>), <string.h> as needed; guard names <ROOT_UPPER>_VERSIONED_H and CONVERTER_<ROOT_UPPER>_H; concise history comment in <Root>_versioned.h.
Output protocol (strict): Return exactly four code blocks, each preceded by a filename marker:

// FILE: <Root>_versioned.h
```c
...code...
```

// FILE: Converter_<Root>.h
```c
...code...
```

// FILE: Converter_<Root>.cpp
```cpp
...code...
```

// FILE: converters.cpp
```cpp
...code...
```

If you must error, return one C comment block only and nothing else."#;

/// Build the user message: task statement, root name, and both headers
/// embedded verbatim between explicit BEGIN/END delimiters.
pub fn build_user_prompt(root: &str, old_header: &str, new_header: &str) -> String {
    format!(
        "Task: Generate a generic adapter. The repository is empty; create all four files.\n\
         \n\
         Root struct name: {root}\n\
         \n\
         OLD header:\n\
         ------------------ BEGIN OLD ------------------\n\
         {old_header}\n\
         ------------------- END OLD -------------------\n\
         \n\
         NEW header:\n\
         ------------------ BEGIN NEW ------------------\n\
         {new_header}\n\
         ------------------- END NEW -------------------\n"
    )
}
