use clipper_core::Msg;

pub const HELP: &str = "\
Commands:
  source <url or path>   set the video source
  query <text>           set the scene to look for (empty for the first 30 seconds)
  submit                 start processing
  download               save the finished clip
  reset                  clear the form and start over (also: new, esc)
  quit                   leave (also: exit)";

/// What one line typed at the prompt asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Msgs(Vec<Msg>),
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_line(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "source" => Command::Msgs(vec![
            Msg::SourceFocused,
            Msg::SourceEdited(rest.to_string()),
            Msg::SourceBlurred,
        ]),
        "query" => Command::Msgs(vec![Msg::QueryEdited(rest.to_string())]),
        "submit" => Command::Msgs(vec![Msg::SubmitClicked]),
        "download" => Command::Msgs(vec![Msg::DownloadClicked]),
        "reset" | "new" | "esc" => Command::Msgs(vec![Msg::ResetClicked]),
        "quit" | "exit" => Command::Quit,
        "help" | "?" => Command::Help,
        _ => Command::Unknown(word.to_string()),
    };
    Some(command)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn blank_lines_are_ignored() {
        assert_eq!(parse_line("   "), None);
    }

    #[test]
    fn source_edit_is_wrapped_in_focus_and_blur() {
        assert_eq!(
            parse_line("source  https://youtu.be/abc \n"),
            Some(Command::Msgs(vec![
                Msg::SourceFocused,
                Msg::SourceEdited("https://youtu.be/abc".into()),
                Msg::SourceBlurred,
            ]))
        );
    }

    #[test]
    fn query_keeps_inner_spaces() {
        assert_eq!(
            parse_line("query dog jumps over fence"),
            Some(Command::Msgs(vec![Msg::QueryEdited(
                "dog jumps over fence".into()
            )]))
        );
        assert_eq!(
            parse_line("query"),
            Some(Command::Msgs(vec![Msg::QueryEdited(String::new())]))
        );
    }

    #[test]
    fn keywords_are_case_insensitive_with_aliases() {
        assert_eq!(
            parse_line("SUBMIT"),
            Some(Command::Msgs(vec![Msg::SubmitClicked]))
        );
        assert_eq!(
            parse_line("esc"),
            Some(Command::Msgs(vec![Msg::ResetClicked]))
        );
        assert_eq!(parse_line("exit"), Some(Command::Quit));
        assert_eq!(parse_line("?"), Some(Command::Help));
    }

    #[test]
    fn unknown_words_are_reported() {
        assert_eq!(
            parse_line("launch now"),
            Some(Command::Unknown("launch".into()))
        );
    }
}
