use uuid::Uuid;

use crate::{
    entities::{
        education::Education,
        experience::WorkExperience,
        hobby::{Hobby, HOBBY_ICONS},
        journey::{Journey, JourneyView},
        language::{Language, LanguageLevel},
        pages::{AboutPage, ContactPage, HomePage, ProjectsPage, SiteInfo, SkillGroup, SkillsPage},
        profile::{PersonalInfo, Profile},
        project::Project,
        skill::{Skill, SkillCategory},
    },
    errors::AppError,
    repositories::{content::ContentRepository, user::UserRepository},
    utils::markdown::safe_markdown_to_html,
};

const FEATURED_ON_HOME: usize = 3;
const SKILLS_ON_HOME: usize = 6;

/// Read-only views of the site owner's content for the public pages.
pub struct PagesHandler<U, R>
where
    U: UserRepository,
{
    pub user_repo: U,
    pub content: R,
    site_name: String,
    placeholder_url: String,
    max_rows: i64,
}

fn with_placeholder(url: &mut Option<String>, placeholder: &str) {
    if url.as_deref().is_none_or(|u| u.trim().is_empty()) {
        *url = Some(placeholder.to_string());
    }
}

/// Featured projects first; when none are flagged, the newest ones.
fn pick_featured(projects: Vec<Project>, count: usize) -> Vec<Project> {
    let (featured, rest): (Vec<_>, Vec<_>) = projects.into_iter().partition(|p| p.featured);
    let source = if featured.is_empty() { rest } else { featured };
    source.into_iter().take(count).collect()
}

fn top_skills(mut skills: Vec<Skill>, count: usize) -> Vec<Skill> {
    skills.sort_by(|a, b| b.proficiency.cmp(&a.proficiency).then_with(|| a.name.cmp(&b.name)));
    skills.truncate(count);
    skills
}

/// Groups in the canonical category order; unknown categories go last.
fn group_skills(skills: Vec<Skill>) -> Vec<SkillGroup> {
    let mut groups: Vec<SkillGroup> = Vec::new();
    for skill in skills {
        match groups.iter_mut().find(|g| g.category == skill.category) {
            Some(group) => group.skills.push(skill),
            None => groups.push(SkillGroup {
                category: skill.category.clone(),
                skills: vec![skill],
            }),
        }
    }

    let rank = |category: &str| {
        SkillCategory::ALL
            .iter()
            .position(|c| c.as_str() == category)
            .unwrap_or(SkillCategory::ALL.len())
    };
    groups.sort_by_key(|g| rank(&g.category));
    groups
}

fn render_journey(journey: Journey) -> JourneyView {
    JourneyView {
        content_html: safe_markdown_to_html(&journey.content),
        content: journey.content,
        updated_at: journey.updated_at,
    }
}

impl<U, R> PagesHandler<U, R>
where
    U: UserRepository,
    R: ContentRepository<Profile>
        + ContentRepository<PersonalInfo>
        + ContentRepository<Journey>
        + ContentRepository<Project>
        + ContentRepository<Skill>
        + ContentRepository<WorkExperience>
        + ContentRepository<Education>
        + ContentRepository<Language>
        + ContentRepository<Hobby>,
{
    pub fn new(user_repo: U, content: R, site_name: String, placeholder_url: String, max_rows: i64) -> Self {
        PagesHandler {
            user_repo,
            content,
            site_name,
            placeholder_url,
            max_rows,
        }
    }

    async fn owner(&self) -> Result<Option<Uuid>, AppError> {
        let owner = self.user_repo.get_site_owner().await?;
        if owner.is_none() {
            tracing::debug!("No site owner yet; serving empty pages");
        }
        Ok(owner.map(|u| u.id))
    }

    async fn profile(&self, owner: &Uuid) -> Result<Option<Profile>, AppError> {
        let mut profile = ContentRepository::<Profile>::find_single(&self.content, owner).await?;
        if let Some(p) = profile.as_mut() {
            with_placeholder(&mut p.avatar_url, &self.placeholder_url);
        }
        Ok(profile)
    }

    async fn personal_info(&self, owner: &Uuid) -> Result<Option<PersonalInfo>, AppError> {
        ContentRepository::<PersonalInfo>::find_single(&self.content, owner).await
    }

    async fn projects(&self, owner: &Uuid) -> Result<Vec<Project>, AppError> {
        let mut projects = ContentRepository::<Project>::list_for_owner(&self.content, owner, self.max_rows).await?;
        for project in projects.iter_mut() {
            with_placeholder(&mut project.image_url, &self.placeholder_url);
        }
        Ok(projects)
    }

    async fn skills(&self, owner: &Uuid) -> Result<Vec<Skill>, AppError> {
        let mut skills = ContentRepository::<Skill>::list_for_owner(&self.content, owner, self.max_rows).await?;
        for skill in skills.iter_mut() {
            with_placeholder(&mut skill.image_url, &self.placeholder_url);
        }
        Ok(skills)
    }

    pub async fn home(&self) -> Result<HomePage, AppError> {
        let Some(owner) = self.owner().await? else {
            return Ok(HomePage::default());
        };

        let (profile, personal_info, projects, skills) = futures::try_join!(
            self.profile(&owner),
            self.personal_info(&owner),
            self.projects(&owner),
            self.skills(&owner),
        )?;

        Ok(HomePage {
            profile,
            featured_projects: pick_featured(projects, FEATURED_ON_HOME),
            top_skills: top_skills(skills, SKILLS_ON_HOME),
            personal_info,
        })
    }

    pub async fn about(&self) -> Result<AboutPage, AppError> {
        let Some(owner) = self.owner().await? else {
            return Ok(AboutPage::default());
        };

        let (profile, personal_info, journey) = futures::try_join!(
            self.profile(&owner),
            self.personal_info(&owner),
            ContentRepository::<Journey>::find_single(&self.content, &owner),
        )?;
        let (experience, education, languages, hobbies) = futures::try_join!(
            ContentRepository::<WorkExperience>::list_for_owner(&self.content, &owner, self.max_rows),
            ContentRepository::<Education>::list_for_owner(&self.content, &owner, self.max_rows),
            ContentRepository::<Language>::list_for_owner(&self.content, &owner, self.max_rows),
            ContentRepository::<Hobby>::list_for_owner(&self.content, &owner, self.max_rows),
        )?;

        Ok(AboutPage {
            profile,
            personal_info,
            journey: journey.map(render_journey),
            experience,
            education,
            languages,
            hobbies,
        })
    }

    pub async fn projects_page(&self) -> Result<ProjectsPage, AppError> {
        let Some(owner) = self.owner().await? else {
            return Ok(ProjectsPage::default());
        };
        Ok(ProjectsPage { projects: self.projects(&owner).await? })
    }

    pub async fn skills_page(&self) -> Result<SkillsPage, AppError> {
        let Some(owner) = self.owner().await? else {
            return Ok(SkillsPage::default());
        };
        Ok(SkillsPage { categories: group_skills(self.skills(&owner).await?) })
    }

    pub async fn contact_page(&self) -> Result<ContactPage, AppError> {
        let Some(owner) = self.owner().await? else {
            return Ok(ContactPage::default());
        };

        let (profile, personal_info) = futures::try_join!(self.profile(&owner), self.personal_info(&owner))?;
        Ok(ContactPage { profile, personal_info })
    }

    pub async fn site_info(&self) -> Result<SiteInfo, AppError> {
        let users = self.user_repo.count_users().await?;

        Ok(SiteInfo {
            name: self.site_name.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            placeholder_image_url: self.placeholder_url.clone(),
            signup_open: users == 0,
            skill_categories: SkillCategory::ALL.iter().map(|c| c.as_str()).collect(),
            language_levels: LanguageLevel::ALL.iter().map(|l| l.as_str()).collect(),
            hobby_icons: HOBBY_ICONS.to_vec(),
        })
    }
}
