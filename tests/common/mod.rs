use scrib::incremental::last_value;
use scrib::types::KindSet;

pub fn resolve(code: &str) -> String {
    resolve_with(code, KindSet::default())
}

pub fn resolve_with(code: &str, kinds: KindSet) -> String {
    let mut output = Vec::new();

    match last_value(code, kinds, &mut output) {
        Ok(Some(value)) => format!("{}", value),
        Ok(None) => "-".to_string(),
        Err(e) => format!("error: {}", e),
    }
}
