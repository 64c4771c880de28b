use serde::Serialize;

use crate::entities::{
    education::Education, experience::WorkExperience, hobby::Hobby, journey::JourneyView,
    language::Language, profile::{PersonalInfo, Profile}, project::Project, skill::Skill,
};

#[derive(Debug, Default, Serialize)]
pub struct HomePage {
    pub profile: Option<Profile>,
    pub featured_projects: Vec<Project>,
    pub top_skills: Vec<Skill>,
    pub personal_info: Option<PersonalInfo>,
}

#[derive(Debug, Default, Serialize)]
pub struct AboutPage {
    pub profile: Option<Profile>,
    pub personal_info: Option<PersonalInfo>,
    pub journey: Option<JourneyView>,
    pub experience: Vec<WorkExperience>,
    pub education: Vec<Education>,
    pub languages: Vec<Language>,
    pub hobbies: Vec<Hobby>,
}

#[derive(Debug, Default, Serialize)]
pub struct ProjectsPage {
    pub projects: Vec<Project>,
}

#[derive(Debug, Serialize)]
pub struct SkillGroup {
    pub category: String,
    pub skills: Vec<Skill>,
}

#[derive(Debug, Default, Serialize)]
pub struct SkillsPage {
    pub categories: Vec<SkillGroup>,
}

#[derive(Debug, Default, Serialize)]
pub struct ContactPage {
    pub profile: Option<Profile>,
    pub personal_info: Option<PersonalInfo>,
}

#[derive(Debug, Serialize)]
pub struct SiteInfo {
    pub name: String,
    pub version: String,
    pub placeholder_image_url: String,
    pub signup_open: bool,
    pub skill_categories: Vec<&'static str>,
    pub language_levels: Vec<&'static str>,
    pub hobby_icons: Vec<&'static str>,
}
