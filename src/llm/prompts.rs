// src/llm/prompts.rs

//! System prompts and message assembly. The prompts spell out the marker
//! grammar verbatim; the patch engine depends on the model echoing those
//! exact strings back, so keep them in sync with `patch::markers`.

use crate::models::{ChatMessage, Page};

pub const PROMPT_FOR_PROJECT_NAME: &str = "REQUIRED: Generate a name for the project, based on the user's request. Try to be creative and unique. Add a emoji at the end of the name. It should be short, like 6 words. Be fancy, creative and funny. DON'T FORGET IT, IT'S IMPORTANT!";

/// System prompt for brand-new projects: one full HTML document per page,
/// wrapped in title markers.
pub const INITIAL_SYSTEM_PROMPT: &str = r#"You are an expert UI/UX Designer and Front-End Developer specializing in modern, production-quality interfaces.
You create websites using HTML, CSS, and JavaScript with a focus on exceptional design quality, accessibility, and performance.

## Technical Requirements:
- ALWAYS use TailwindCSS as the primary styling framework, imported via CDN: <script src="https://cdn.tailwindcss.com"></script>
- Use Feather Icons for iconography and subtle animations with Anime.js
- Mobile-first responsive design; semantic HTML; alt text for all images
- Create multi-page websites when the user requests different pages

## Output Format:
Return results in ```html markdown blocks. Format as:

1. Start with <<<<<<< PROJECT_NAME_START
2. Add creative project name with emoji
3. Close with  >>>>>>> PROJECT_NAME_END
4. For each page:
   - Start with <<<<<<< START_TITLE
   - Add filename (e.g., index.html, about.html)
   - Close with  >>>>>>> END_TITLE
   - Add HTML in ```html code block

Example:
<<<<<<< PROJECT_NAME_START Stellar Dashboard ✨ >>>>>>> PROJECT_NAME_END
<<<<<<< START_TITLE index.html >>>>>>> END_TITLE
```html
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Stellar Dashboard</title>
    <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="bg-gray-50 text-gray-900 antialiased">
    <main class="container mx-auto px-4 py-8">
        <h1 class="text-4xl font-bold">Hello World</h1>
    </main>
</body>
</html>
```

IMPORTANT:
- First file MUST be named index.html
- No explanations needed - just return the code
- Focus on EXCEPTIONAL design quality"#;

/// System prompt for follow-up edits: search/replace triplets scoped to
/// update-page regions, whole files only for new pages.
pub const FOLLOW_UP_SYSTEM_PROMPT: &str = r#"You are an expert UI/UX Designer and Front-End Developer modifying existing HTML files.
Apply changes to enhance or extend the website based on user requests.

## Output Rules:
- Output ONLY the changes using UPDATE_PAGE_START and SEARCH/REPLACE format
- Do NOT output entire files
- For new pages, use NEW_PAGE_START format

## Update Format:
1. <<<<<<< UPDATE_PAGE_START filename.html >>>>>>> UPDATE_PAGE_END
2. <<<<<<< SEARCH
   [exact lines to replace]
=======
   [new replacement lines]
>>>>>>> REPLACE

Example - Modifying Code:
<<<<<<< UPDATE_PAGE_START index.html >>>>>>> UPDATE_PAGE_END
<<<<<<< SEARCH
    <h1 class="text-2xl">Old Title</h1>
=======
    <h1 class="text-4xl font-bold">New Title</h1>
>>>>>>> REPLACE

Example - Adding New Page:
<<<<<<< NEW_PAGE_START about.html >>>>>>> NEW_PAGE_END
```html
<!DOCTYPE html>
<html lang="en">
<head><title>About</title></head>
<body><h1>About Us</h1></body>
</html>
```

IMPORTANT:
- When creating new pages, UPDATE ALL OTHER PAGES to add navigation links
- SEARCH blocks must EXACTLY match current code including whitespace
- No explanations - just return the changes
- Use only href for navigation, never onclick"#;

/// Messages for an initial generation request.
pub fn initial_messages(prompt: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(INITIAL_SYSTEM_PROMPT),
        ChatMessage::user(prompt),
    ]
}

/// Messages for a follow-up edit: system rules, a short user context, an
/// assistant turn carrying the current page set (and the selected element,
/// when the user pinned one), then the user's request.
pub fn follow_up_messages(
    prompt: &str,
    pages: &[Page],
    selected_element: Option<&str>,
    is_new_project: bool,
) -> Vec<ChatMessage> {
    let system_prompt = if is_new_project {
        format!("{}\n{}", FOLLOW_UP_SYSTEM_PROMPT, PROMPT_FOR_PROJECT_NAME)
    } else {
        FOLLOW_UP_SYSTEM_PROMPT.to_string()
    };

    let pages_context = pages
        .iter()
        .map(|p| format!("- {}\n{}", p.path, p.html))
        .collect::<Vec<_>>()
        .join("\n\n");

    let element_context = match selected_element {
        Some(element) => format!(
            "\n\nYou have to update ONLY the following element, NOTHING ELSE: \n\n```html\n{}\n``` Could be in multiple pages, if so, update all the pages.",
            element
        ),
        None => String::new(),
    };

    let assistant_context = format!(
        "{}. Current pages ({} total): {}",
        element_context,
        pages.len(),
        pages_context
    );

    vec![
        ChatMessage::system(system_prompt),
        ChatMessage::user("You are modifying the HTML file based on the user's request."),
        ChatMessage::assistant(assistant_context),
        ChatMessage::user(prompt),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::markers;

    #[test]
    fn prompts_carry_the_exact_marker_tokens() {
        // The engine scans for these byte-for-byte; prompt drift would break
        // parsing silently.
        assert!(INITIAL_SYSTEM_PROMPT.contains(markers::TITLE_PAGE_START));
        assert!(INITIAL_SYSTEM_PROMPT.contains(markers::TITLE_PAGE_END));
        assert!(INITIAL_SYSTEM_PROMPT.contains(markers::PROJECT_NAME_START));
        assert!(FOLLOW_UP_SYSTEM_PROMPT.contains(markers::SEARCH_START));
        assert!(FOLLOW_UP_SYSTEM_PROMPT.contains(markers::DIVIDER));
        assert!(FOLLOW_UP_SYSTEM_PROMPT.contains(markers::REPLACE_END));
        assert!(FOLLOW_UP_SYSTEM_PROMPT.contains(markers::UPDATE_PAGE_START));
        assert!(FOLLOW_UP_SYSTEM_PROMPT.contains(markers::NEW_PAGE_START));
    }

    #[test]
    fn follow_up_messages_embed_pages_and_prompt() {
        let pages = vec![Page::new("index.html", "<h1>Hi</h1>")];
        let messages = follow_up_messages("make it blue", &pages, None, false);
        assert_eq!(messages.len(), 4);
        assert!(messages[2].content.contains("index.html"));
        assert!(messages[2].content.contains("<h1>Hi</h1>"));
        assert_eq!(messages[3].content, "make it blue");
    }

    #[test]
    fn project_name_instruction_only_for_new_projects() {
        let pages = vec![Page::new("index.html", "")];
        let new_project = follow_up_messages("x", &pages, None, true);
        let existing = follow_up_messages("x", &pages, None, false);
        assert!(new_project[0].content.contains(PROMPT_FOR_PROJECT_NAME));
        assert!(!existing[0].content.contains(PROMPT_FOR_PROJECT_NAME));
    }

    #[test]
    fn selected_element_is_scoped_into_context() {
        let pages = vec![Page::new("index.html", "<h1>Hi</h1>")];
        let messages =
            follow_up_messages("recolor it", &pages, Some("<h1>Hi</h1>"), false);
        assert!(messages[2].content.contains("ONLY the following element"));
    }
}
