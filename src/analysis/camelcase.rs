/// Splits a camelCased name into its parts.
///
/// Characters are grouped into runs of the same class (lowercase, uppercase,
/// digit, other); an uppercase run directly followed by a lowercase run
/// donates its last character to that run, so `"HTTPServer"` splits into
/// `["HTTP", "Server"]` rather than `["HTTPS", "erver"]`.
pub fn split(name: &str) -> Vec<String> {
    #[derive(PartialEq, Clone, Copy)]
    enum Class {
        Lower,
        Upper,
        Digit,
        Other,
    }

    fn class_of(c: char) -> Class {
        if c.is_lowercase() {
            Class::Lower
        } else if c.is_uppercase() {
            Class::Upper
        } else if c.is_numeric() {
            Class::Digit
        } else {
            Class::Other
        }
    }

    let mut runs: Vec<(Class, String)> = Vec::new();
    for c in name.chars() {
        let class = class_of(c);
        match runs.last_mut() {
            Some((last, run)) if *last == class => run.push(c),
            _ => runs.push((class, c.to_string())),
        }
    }

    // "ABCWord" is three runs in source order, but semantically "ABC" + "Word".
    let mut parts: Vec<String> = Vec::with_capacity(runs.len());
    let mut i = 0;
    while i < runs.len() {
        let (class, run) = &runs[i];
        if *class == Class::Upper
            && i + 1 < runs.len()
            && runs[i + 1].0 == Class::Lower
            && run.chars().count() > 1
        {
            let boundary = run.char_indices().last().map(|(at, _)| at).unwrap_or(0);
            let (head, tail) = run.split_at(boundary);
            parts.push(head.to_string());
            parts.push(format!("{}{}", tail, runs[i + 1].1));
            i += 2;
            continue;
        }
        if *class == Class::Upper && i + 1 < runs.len() && runs[i + 1].0 == Class::Lower {
            parts.push(format!("{}{}", run, runs[i + 1].1));
            i += 2;
            continue;
        }
        parts.push(run.clone());
        i += 1;
    }

    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lowercase_word_is_one_part() {
        assert_eq!(split("car"), vec!["car"]);
    }

    #[test]
    fn splits_on_case_transitions() {
        assert_eq!(split("FastCar"), vec!["Fast", "Car"]);
        assert_eq!(split("camelCase"), vec!["camel", "Case"]);
        assert_eq!(split("CityOfRotterdam"), vec!["City", "Of", "Rotterdam"]);
    }

    #[test]
    fn acronym_keeps_its_letters() {
        assert_eq!(split("HTTPServer"), vec!["HTTP", "Server"]);
        assert_eq!(split("PDF"), vec!["PDF"]);
    }

    #[test]
    fn digits_are_their_own_parts() {
        assert_eq!(split("Formula1Racing"), vec!["Formula", "1", "Racing"]);
    }

    #[test]
    fn empty_input_has_no_parts() {
        assert!(split("").is_empty());
    }
}
