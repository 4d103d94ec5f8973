use log::Level;

/// The level for per-step search records.
///
/// Verbose searches log each step at `Info`, quiet ones still leave them at
/// `Trace` for whoever enables it. Either way, logging never changes what a
/// search does.
#[inline(always)]
#[must_use]
pub fn step_level(verbose: bool) -> Level {
    if verbose { Level::Info } else { Level::Trace }
}

/// Returns a shorter version of [`std::any::type_name`]
// MIT from https://github.com/jakobhellermann/pretty-type-name/tree/main
pub fn type_name<T: ?Sized>() -> String {
    let name = std::any::type_name::<T>();
    type_name_str(name)
}

fn type_name_str(name: &str) -> String {
    if let Some(before) = name.strip_suffix("::{{closure}}") {
        return format!("{}::{{{{closure}}}}", type_name_str(before));
    }

    // code taken from [bevy](https://github.com/bevyengine/bevy/blob/89a41bc62843be5f92b4b978f6d801af4de14a2d/crates/bevy_reflect/src/type_registry.rs#L156)
    let mut short_name = String::new();

    // A typename may be a composition of several other type names (e.g. generic parameters)
    // separated by the characters that we try to find below.
    // Then, each individual typename is shortened to its last path component.
    let mut remainder = name;
    while let Some(index) = remainder.find(&['&', '<', '>', '(', ')', '[', ']', ',', ';'][..]) {
        let (path, new_remainder) = remainder.split_at(index);
        // Push the shortened path in front of the found character
        short_name.push_str(last_path_component(path));
        // Push the character that was found
        let Some(character) = new_remainder.chars().next() else {
            break;
        };
        short_name.push(character);
        // Advance the remainder
        if character == ',' || character == ';' {
            // A comma or semicolon is always followed by a space
            short_name.push(' ');
            remainder = new_remainder.get(2..).unwrap_or_default();
        } else {
            remainder = &new_remainder[1..];
        }
    }

    // The remainder will only be non-empty if there were no matches at all
    if !remainder.is_empty() {
        // Then, the full typename is a path that has to be shortened
        short_name.push_str(last_path_component(remainder));
    }

    short_name
}

#[inline(always)]
fn last_path_component(path: &str) -> &str {
    path.rsplit(':').next().unwrap_or(path)
}
