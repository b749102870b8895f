//! Sample content loaded by the dashboard's seed action.
//!
//! Icons are symbolic tokens; the site maps them to bundled assets.

use crate::modules::portfolio::application::domain::entities::{
    Education, EducationKind, Experience, Project, Tag,
};

pub struct SeedCategory {
    pub title: &'static str,
    /// `(name, icon)`
    pub technologies: &'static [(&'static str, &'static str)],
}

pub const SKILL_CATEGORIES: &[SeedCategory] = &[
    SeedCategory {
        title: "AI & Automation Tools",
        technologies: &[
            ("Quadratic.ai", "quadratic"),
            ("UiPath", "uipath"),
            ("Power Automate", "powerautomate"),
            ("N8N", "n8n"),
        ],
    },
    SeedCategory {
        title: "Programming Languages",
        technologies: &[("Python", "python"), ("SQL", "sql")],
    },
    SeedCategory {
        title: "Data & Analytics Tools",
        technologies: &[
            ("Zoho Analytics", "zohoanalytics"),
            ("Power BI", "powerbi"),
            ("Tableau", "tableau"),
            ("Microsoft Excel", "excel"),
            ("MySQL", "mysql"),
        ],
    },
    SeedCategory {
        title: "Testing & Automation Tools",
        technologies: &[
            ("Zoho QEngine", "zohoqengine"),
            ("Selenium WebDriver", "selenium"),
            ("Power Apps", "powerapps"),
            ("Appium", "appium"),
        ],
    },
    SeedCategory {
        title: "Version Control & Development",
        technologies: &[("GitHub", "github"), ("Git", "git")],
    },
];

fn tag(name: &str, color: &str) -> Tag {
    Tag {
        name: name.to_string(),
        color: color.to_string(),
    }
}

fn points(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|l| l.to_string()).collect()
}

pub fn projects() -> Vec<Project> {
    vec![
        Project {
            name: "Car Rent".into(),
            description: "Web platform for browsing, booking, and managing car rentals from multiple providers.".into(),
            tags: vec![
                tag("react", "blue-text-gradient"),
                tag("mongodb", "green-text-gradient"),
                tag("tailwind", "pink-text-gradient"),
            ],
            image: String::new(),
            source_code_link: "https://github.com/".into(),
            demo_link: None,
        },
        Project {
            name: "Job IT".into(),
            description: "Application for searching job openings, viewing salary ranges, and finding roles by location.".into(),
            tags: vec![
                tag("react", "blue-text-gradient"),
                tag("restapi", "green-text-gradient"),
                tag("scss", "pink-text-gradient"),
            ],
            image: String::new(),
            source_code_link: "https://github.com/".into(),
            demo_link: None,
        },
    ]
}

pub fn experiences() -> Vec<Experience> {
    vec![
        Experience {
            title: "SOC Operations Intern".into(),
            company_name: "L&T Technology Services".into(),
            icon: "lt".into(),
            icon_bg: "#383E56".into(),
            date: "Jul 2024 – Aug 2024".into(),
            points: points(&[
                "Developed a clear understanding of SOC workflows and operations.",
                "Explored common cyber threats, attack vectors, and incident prioritization.",
                "Gained foundational knowledge of SIEM tools and threat detection processes.",
                "Learned how log data is analyzed and correlated for threat identification.",
            ]),
        },
        Experience {
            title: "Data Analyst Intern".into(),
            company_name: "Intelizign".into(),
            icon: "intelizign".into(),
            icon_bg: "#E6DEDD".into(),
            date: "Jan 2025 – Mar 2025".into(),
            points: points(&[
                "Collaborated with the data analytics team to understand internal workflows.",
                "Developed dashboards to track cybersecurity incidents across multiple sources.",
                "Built visual reports for improved security monitoring and insights.",
            ]),
        },
        Experience {
            title: "Automation Testing Intern".into(),
            company_name: "Fastack.ai".into(),
            icon: "fastack".into(),
            icon_bg: "#383E56".into(),
            date: "Jun 2025 – Aug 2025".into(),
            points: points(&[
                "Contributed to LucaGPT, an AI assistant for Tally Prime users.",
                "Designed and automated test scripts using Selenium with Java.",
                "Performed functional, regression, and UI testing for product stability.",
                "Documented test cases, test data, and structured bug reports.",
                "Worked with QA and development teams to reproduce and resolve defects.",
            ]),
        },
        Experience {
            title: "Process Optimization Intern".into(),
            company_name: "House of Accountants".into(),
            icon: "hoa".into(),
            icon_bg: "#E6DEDD".into(),
            date: "Aug 2025 – Oct 2025".into(),
            points: points(&[
                "Automated financial workflows with n8n, reducing manual processes.",
                "Gained experience with workflow automation, APIs, and process optimization.",
            ]),
        },
    ]
}

pub fn educations() -> Vec<Education> {
    vec![
        Education {
            institution: "Chennai National Arts & Science College".into(),
            degree: "BSc Computer Science".into(),
            year: "2020-2023".into(),
            kind: EducationKind::Education,
            description: "Bachelor of Science in Computer Science".into(),
        },
        Education {
            institution: "The New College".into(),
            degree: "MSc Computer Science".into(),
            year: "2023-2025".into(),
            kind: EducationKind::Education,
            description: "Master of Science in Computer Science".into(),
        },
    ]
}

pub fn skill_description(name: &str) -> String {
    format!("Proficient in {name}")
}
