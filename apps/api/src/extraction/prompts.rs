// All LLM prompt constants for the extraction module.
// Templates use `{placeholder}` substitution; shared fragments live in llm_client::prompts.

pub const CV_PARSE_SYSTEM: &str = "You are an expert French recruiter and résumé parser. \
    You read CVs written for the French job market (CDI, CDD, alternance, Bac+N diplomas, \
    grandes écoles) and extract them into structured JSON. \
    You MUST respond with a single valid JSON object only. No markdown fences, no explanations.";

pub const CV_PARSE_PROMPT_TEMPLATE: &str = r#"Extract the following CV into a JSON object.

{grounding_instruction}

Return a JSON object with this EXACT schema (no extra fields):
{
  "personal_info": {
    "full_name": "Camille Martin",
    "title": "Développeuse Full-Stack",
    "email": "camille.martin@example.fr",
    "phone": "06 12 34 56 78",
    "location": "Lyon"
  },
  "summary": "string or null",
  "experiences": [
    {
      "title": "Développeuse Full-Stack",
      "company": "Doctolib",
      "start_date": "2021-09",
      "end_date": null,
      "sector": "Santé numérique",
      "description": "string or null",
      "achievements": ["Réduction de 40% du temps de chargement"],
      "skills": ["TypeScript", "PostgreSQL"]
    }
  ],
  "education": [
    {"degree": "Master Informatique", "institution": "Université Lyon 1", "year": 2019, "level": "Bac+5"}
  ],
  "skills": [
    {"name": "TypeScript", "level": "avance", "category": "technique"}
  ],
  "languages": [
    {"name": "Anglais", "level": "C1"}
  ],
  "certifications": ["AWS Certified Developer"],
  "sectors": ["Santé numérique"]
}

Rules:
- Dates are "YYYY-MM" (use "YYYY" when only the year is known). end_date is null for a current position.
- Skill "level" is one of "debutant", "intermediaire", "avance", "expert", or null when the CV does not say.
- "sectors" lists the business sectors the candidate has worked in (e.g. "Banque", "Industrie", "Retail").
- Keep the CV's own wording for titles, companies and achievements.

CV:
{cv_text}"#;

pub const JOB_PARSE_SYSTEM: &str = "You are an expert French recruiter analysing job postings \
    (offres d'emploi) for the French market. You extract requirements precisely and never \
    promote a nice-to-have into a requirement. \
    You MUST respond with a single valid JSON object only. No markdown fences, no explanations.";

pub const JOB_PARSE_PROMPT_TEMPLATE: &str = r#"Extract the following job posting into a JSON object.

{grounding_instruction}

Return a JSON object with this EXACT schema (no extra fields):
{
  "title": "Chef de projet digital",
  "company": "string or null",
  "location": "Paris (75)",
  "contract_type": "cdi",
  "sector": "Grande distribution",
  "seniority": "confirmé",
  "min_experience_years": 5,
  "required_skills": [
    {"name": "Gestion de projet", "level": "avance", "required": true},
    {"name": "SQL", "level": null, "required": false}
  ],
  "keywords": [
    {"keyword": "agile", "weight": 0.8}
  ],
  "responsibilities": ["Piloter les projets e-commerce de bout en bout"],
  "salary": {"min": 45000, "max": 55000, "currency": "EUR", "period": "annuel"}
}

Rules:
- contract_type is one of "cdi", "cdd", "freelance", "stage", "alternance", "interim", or "inconnu".
- required = true for "requis", "indispensable", "maîtrise de", "vous avez"; false for "souhaité", "apprécié", "un plus", "idéalement".
- keywords: every meaningful skill, tool, method or domain term an ATS would search for.
  weight in [0, 1]: 1.0 for the job title and hard requirements, 0.6 for responsibilities, 0.3 for company description.
- min_experience_years: the minimum stated ("3 ans minimum", "5+ ans"); null when not stated.
- salary: null when no figure is given. A daily rate (TJM) uses period "journalier".

JOB POSTING:
{job_text}"#;

pub const LINKEDIN_PARSE_SYSTEM: &str = "You are an expert recruiter extracting structured data \
    from the copied text of a LinkedIn profile page. Ignore navigation text, endorsements counts, \
    \"people also viewed\" blocks and other page chrome. \
    You MUST respond with a single valid JSON object only. No markdown fences, no explanations.";

pub const LINKEDIN_PARSE_PROMPT_TEMPLATE: &str = r#"Extract the following LinkedIn profile into a JSON object.

{grounding_instruction}

Return a JSON object with this EXACT schema (no extra fields):
{
  "full_name": "Léa Dubois",
  "headline": "Product Owner chez Alan",
  "about": "string or null",
  "location": "Paris, Île-de-France",
  "industry": "Assurance",
  "positions": [
    {
      "title": "Product Owner",
      "company": "Alan",
      "start_date": "2021-09",
      "end_date": null,
      "location": "Paris",
      "description": "string or null"
    }
  ],
  "education": [
    {"degree": "Master Management", "institution": "ESSEC", "year": 2018, "level": "Bac+5"}
  ],
  "skills": ["Scrum", "Jira"],
  "languages": [{"name": "Anglais", "level": "Courant"}],
  "certifications": ["PSPO I"]
}

Rules:
- Dates are "YYYY-MM" (or "YYYY"); end_date is null for a current position ("aujourd'hui", "Present").
- Split multi-role entries at the same company into separate positions.

PROFILE:
{profile_text}"#;
