use crate::modules::section::application::domain::entities::{SectionContent, SectionId};

const ABOUT: &str = "Data Analytical and detail-driven Data Analyst skilled in SQL, Python, Power BI, and process automation tools such as Power Apps and n8n. Experienced in transforming raw data into strategic insights and developing interactive dashboards to support business and cybersecurity operations. Strong foundation in data integration, workflow automation, and testing across diverse environments. Proven ability to streamline processes, enhance decision-making, and bridge technical solutions with business objectives.";

const SKILLS: &str = "My technical expertise is built on a foundation of diverse technologies, spanning from core programming languages and data analytics to cutting-edge AI automation. I focus on selecting the right tools to build efficient, scalable solutions that bridge the gap between complex data and actionable insights.";

const EXPERIENCE: &str = "Throughout my career, I've built a strong foundation in data analysis, automation, and software development. From implementing complex data pipelines to developing user-friendly dashboards and automating business processes, I've consistently delivered solutions that drive efficiency and informed decision-making. My experience spans across various industries, working with cutting-edge technologies to solve real-world challenges.";

const WORKS: &str = "These projects represent my journey in solving real-world challenges through data-driven approaches and innovative automation. Each work demonstrates my commitment to excellence, showing how I leverage various technologies to build impactful tools, streamline workflows, and deliver meaningful results.";

/// Compiled-in text shown when no document is stored for a section.
pub fn default_content(section: SectionId) -> SectionContent {
    let (p, h2, content) = match section {
        SectionId::About => ("Introduction", "Overview.", Some(ABOUT)),
        SectionId::Skills => ("My technical skills", "Skills.", Some(SKILLS)),
        SectionId::Experience => ("What I have done so far", "Work Experience.", Some(EXPERIENCE)),
        SectionId::Works => ("My work", "Projects.", Some(WORKS)),
        SectionId::Education => ("My education", "Education.", None),
    };

    SectionContent {
        p: p.to_string(),
        h2: h2.to_string(),
        content: content.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_section_has_a_title() {
        for section in SectionId::ALL {
            assert!(!default_content(section).h2.is_empty());
        }
    }

    #[test]
    fn education_has_no_body() {
        assert_eq!(default_content(SectionId::Education).content, None);
    }
}
