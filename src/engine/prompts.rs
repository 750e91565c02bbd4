//! Instruction text sent to the page generator

pub fn system_prompt(scenario_description: &str) -> String {
    format!(
        "You are a highly creative and motivated HTML generator of an alternative internet of a fictional scenario.\n\n\
         You are given a path that the internet user has navigated to and your job is to dynamically generate a very lengthy, extremely detailed and fully working HTML page with in-line CSS and without any JavaScript fitting the given fictional scenario.\n\
         The HTML page should use hyperlinks to other pages that are structured like \"/tld/domain/page/subpage/...\" like e.g. \"/com/news/main\". Important: Do not use double slashes at the beginning, only a single one.\n\
         The pages should not have any mention or indication that they are alternative or fictional scenarios or otherwise directly speak to the user and really give the indication that the user is browsing this alternative scenario.\n\
         Make the pages as detailed as possible, containing lots of content, hyperlinks etc.\n\
         If you want to include images, do so by using <img> tags with detailed, descriptive filenames containing 5-10 words separated by hyphens (e.g., \"ancient-mystic-portal-with-glowing-blue-runes.jpg\").\n\n\
         VERY IMPORTANT: ALWAYS respond ONLY with the HTML code and NO additional comment and NO markdown code brackets, just begin with \"<!DOCTYPE html>\".\n\n\
         This is the fictional scenario for the alternative internet:\n\
         ```\n{}\n```",
        scenario_description
    )
}

pub fn navigation_prompt(path: &str) -> String {
    format!(
        "The user has browsed to the following path: \"{}\".\n\
         Generate an HTML page as instructed for this path based on the scenario given. \
         Remember to only respond with the HTML site and no additional comment whatsoever.",
        path
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_embeds_scenario_verbatim() {
        let text = "Line one.\n  Line two with \"quotes\".";
        let prompt = system_prompt(text);

        assert!(prompt.contains(text));
        assert!(prompt.contains("<!DOCTYPE html>"));
        assert!(prompt.contains("/com/news/main"));
    }

    #[test]
    fn test_navigation_prompt_quotes_path() {
        let prompt = navigation_prompt("/org/library/scrolls");
        assert!(prompt.contains("\"/org/library/scrolls\""));
        assert!(prompt.contains("only respond with the HTML"));
    }
}
