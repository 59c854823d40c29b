use crate::domain::model::PathSuggestionRequest;

/// Renders the fixed instruction template. Values are inserted verbatim in a
/// single pass, so braces inside user text are never expanded again.
pub fn render(request: &PathSuggestionRequest) -> String {
    format!(
        "You are an AI learning path suggestion expert.\n\
         \n\
         Based on the user's goals and trending skills, suggest a list of learning paths.\n\
         \n\
         User Goals: {}\n\
         Trending Skills: {}\n\
         \n\
         Suggest learning paths that are efficient and focus on the most relevant content.\n\
         \n\
         The suggested learning paths should be a list of strings.\n",
        request.user_goals, request.trending_skills
    )
}
