//! Fixed-template report used once every assistant attempt has failed.

use careerlens_core::ObjectiveTag;
use careerlens_scraper::extract_name;
use serde_json::Value;

/// Builds the fallback report for `profile`. Pure and infallible.
#[must_use]
pub fn fallback_report(profile: &Value, objective: &ObjectiveTag) -> String {
    let name = extract_name(profile);
    let objective = objective.description();

    format!(
        "# LinkedIn Profile Analysis: {name}

Objective: {objective}

## 1. General Summary

{name}, your profile already gives recruiters a starting point, and with a few focused \
adjustments it can communicate much more clearly who you are and what you deliver. \
This review is aimed at your objective: {objective}.

## 2. Strengths

- You have an active LinkedIn presence, which is the first step to being found by recruiters.
- Your profile lists experience and skills that can be turned into concrete achievements.
- Technology is a field where a well-structured profile quickly stands out.

## 3. Improvement Opportunities

- Headline: describe what you do (\"Developer\" or \"Programmer\" plus your field) instead \
of your status or seniority.
- About section: tell a short story of the problems you solve and the technologies you use.
- Experience: add measurable results to each position, not only responsibilities.
- Skills: keep the list focused on the stack that matches your objective.
- Visuals: use a profile photo with a neutral background and a smile, and a cover image \
related to your field. A professional camera is not required.

## 4. Practical Recommendations

- Rewrite the headline with your main technologies and area of work.
- Pin two or three projects, with links to repositories or live demos.
- Ask former colleagues or mentors for recommendations.
- Connect with recruiters and professionals in the companies you are targeting.
- If the \"Open to Work\" badge is on, consider removing it.

## 5. Immediate Actions

1. Update the headline today.
2. Rewrite the About section in the first person, in up to five short paragraphs.
3. Add one quantified result to each recent experience.
4. Reorder skills so the ten most relevant ones come first.
5. Publish or share one technical post this week.

## 6. Comparative Analysis

Profiles that perform well in this market combine a clear headline, a concise story, \
visible projects and consistent activity. Closing these gaps puts your profile on the same \
level as professionals who are regularly approached by recruiters.

## 7. Final Motivational Message

{name}, every improvement you make to your profile compounds over time. Start with the \
immediate actions above, keep your profile up to date, and stay consistent. Your next \
opportunity may be one update away.
"
    )
}
