/// Removes `<think>...</think>` reasoning blocks some providers prepend to
/// completions. An unclosed block swallows the rest of the text.
pub(crate) fn strip_reasoning(input: &str) -> String {
    let mut cleaned = input.to_string();

    while let Some(think_start) = cleaned.find("<think>") {
        if let Some(think_end_pos) = cleaned[think_start..].find("</think>") {
            let absolute_end = think_start + think_end_pos + "</think>".len();
            cleaned.replace_range(think_start..absolute_end, "");
        } else {
            cleaned.replace_range(think_start.., "");
            break;
        }
    }

    cleaned.trim().to_string()
}
