//! LinkedIn profile (copied text of a public profile) and its conversion to a CV.

use serde::{Deserialize, Serialize};

use super::cv::{CvSkill, Education, Experience, LanguageSkill, ParsedCv, PersonalInfo};
use super::null_as_default;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkedInPosition {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    pub company: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkedInProfile {
    pub full_name: Option<String>,
    pub headline: Option<String>,
    pub about: Option<String>,
    pub location: Option<String>,
    pub industry: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub positions: Vec<LinkedInPosition>,
    #[serde(deserialize_with = "null_as_default")]
    pub education: Vec<Education>,
    #[serde(deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub languages: Vec<LanguageSkill>,
    #[serde(deserialize_with = "null_as_default")]
    pub certifications: Vec<String>,
}

impl LinkedInProfile {
    /// Maps the profile onto the CV structure used by matching.
    /// LinkedIn endorsements carry no level, so skills keep `level: None`.
    pub fn into_cv(self) -> ParsedCv {
        let industry = self.industry.clone();
        ParsedCv {
            personal_info: PersonalInfo {
                full_name: self.full_name,
                title: self.headline,
                email: None,
                phone: None,
                location: self.location,
            },
            summary: self.about,
            experiences: self
                .positions
                .into_iter()
                .map(|p| Experience {
                    title: p.title,
                    company: p.company,
                    start_date: p.start_date,
                    end_date: p.end_date,
                    sector: None,
                    description: p.description,
                    achievements: Vec::new(),
                    skills: Vec::new(),
                })
                .collect(),
            education: self.education,
            skills: self
                .skills
                .into_iter()
                .map(|name| CvSkill {
                    name,
                    level: None,
                    category: None,
                })
                .collect(),
            languages: self.languages,
            certifications: self.certifications,
            sectors: industry.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_cv_maps_positions_and_skills() {
        let profile = LinkedInProfile {
            full_name: Some("Léa Dubois".to_string()),
            headline: Some("Product Owner chez Alan".to_string()),
            industry: Some("Assurance".to_string()),
            positions: vec![LinkedInPosition {
                title: "Product Owner".to_string(),
                company: Some("Alan".to_string()),
                start_date: Some("2021-09".to_string()),
                end_date: None,
                ..Default::default()
            }],
            skills: vec!["Scrum".to_string(), "Jira".to_string()],
            ..Default::default()
        };

        let cv = profile.into_cv();
        assert_eq!(cv.personal_info.title.as_deref(), Some("Product Owner chez Alan"));
        assert_eq!(cv.experiences.len(), 1);
        assert_eq!(cv.experiences[0].company.as_deref(), Some("Alan"));
        assert_eq!(cv.skills.len(), 2);
        assert!(cv.skills.iter().all(|s| s.level.is_none()));
        assert_eq!(cv.sectors, vec!["Assurance"]);
    }
}
