/// Sanitize filename to remove invalid characters
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            _ => c,
        })
        .collect::<String>()
        .trim()
        .trim_matches(|c| c == '.' || c == ' ')
        .to_string()
}

/// Name to offer in the save dialog for a staged file.
///
/// The backend stages files under `/files/<name>`, so the last path segment
/// is used when there is one; otherwise the title stands in.
pub fn suggested_filename(download_link: &str, title: &str) -> String {
    let from_link = url::Url::parse(download_link).ok().and_then(|link| {
        let segment = link.path_segments()?.next_back()?.to_string();
        let decoded = url::form_urlencoded::parse(format!("n={}", segment).as_bytes())
            .next()
            .map(|(_, v)| v.into_owned())?;
        Some(sanitize_filename(&decoded))
    });

    match from_link {
        Some(name) if !name.is_empty() => name,
        _ => {
            let name = sanitize_filename(title);
            if name.is_empty() {
                "download".to_string()
            } else {
                name
            }
        }
    }
}
