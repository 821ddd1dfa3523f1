//! Deterministic offline fallback — fills a fixed HTML/CSS document with
//! heuristically extracted resume fields. Pure and infallible: defaults
//! absorb any missing data, so every call returns a complete document.

use crate::portfolio::sections::extract_section;

const DEFAULT_EMAIL: &str = "your.email@example.com";
const DEFAULT_PHONE: &str = "(123) 456-7890";
const DEFAULT_SKILLS: &str =
    "Python, JavaScript, React, Flask, HTML/CSS, REST APIs, Database Design";
const DEFAULT_EXPERIENCE: &str =
    "Senior Developer at Tech Company\nBuilt web applications using modern frameworks";
const DEFAULT_EDUCATION: &str = "Bachelor of Science in Computer Science";

/// Contact details are only looked for near the top of the document.
const CONTACT_SCAN_LINES: usize = 10;
/// Skills past the cap are dropped from the tag cloud.
const MAX_SKILL_TAGS: usize = 8;

/// Renders the fixed portfolio document from raw resume text.
pub fn render_portfolio(resume_text: &str) -> String {
    let email = find_contact_line(resume_text, |line| line.contains('@'))
        .unwrap_or(DEFAULT_EMAIL)
        .to_string();
    let phone = find_contact_line(resume_text, |line| {
        line.contains('(') && line.chars().any(|c| c.is_ascii_digit())
    })
    .unwrap_or(DEFAULT_PHONE)
    .to_string();

    let skills = fallback_if_empty(
        extract_section(resume_text, &["skills", "technical", "proficiency"]),
        DEFAULT_SKILLS,
    );
    let experience = fallback_if_empty(
        extract_section(resume_text, &["experience", "work", "employment"]),
        DEFAULT_EXPERIENCE,
    );
    let education = fallback_if_empty(
        extract_section(resume_text, &["education", "academic"]),
        DEFAULT_EDUCATION,
    );

    PORTFOLIO_TEMPLATE
        .replace("{email}", &escape_html(&email))
        .replace("{phone}", &escape_html(&phone))
        .replace("{skills_html}", &render_skill_tags(&skills))
        .replace("{experience}", &escape_html(&experience))
        .replace("{education}", &escape_html(&education))
}

/// First matching line among the leading `CONTACT_SCAN_LINES`, trimmed.
fn find_contact_line(resume_text: &str, matches: impl Fn(&str) -> bool) -> Option<&str> {
    resume_text
        .lines()
        .take(CONTACT_SCAN_LINES)
        .find(|line| matches(line))
        .map(str::trim)
}

fn fallback_if_empty(extracted: String, default: &str) -> String {
    if extracted.is_empty() {
        default.to_string()
    } else {
        extracted
    }
}

/// Comma-separated skills as inline tag elements, capped at `MAX_SKILL_TAGS`.
fn render_skill_tags(skills: &str) -> String {
    skills
        .split(',')
        .take(MAX_SKILL_TAGS)
        .map(|skill| {
            format!(
                r#"<span class="skill-tag">{}</span>"#,
                escape_html(skill.trim())
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Minimal HTML escaping for values interpolated into the fixed template.
fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// The fixed document. Placeholders are substituted, never formatted, so the
/// embedded CSS braces stay literal.
const PORTFOLIO_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Professional Portfolio</title>
    <style>
        * {
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }

        body {
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            line-height: 1.6;
            color: #333;
            background: #f4f4f4;
        }

        header {
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
            color: white;
            padding: 60px 20px;
            text-align: center;
            box-shadow: 0 2px 10px rgba(0,0,0,0.1);
        }

        header h1 {
            font-size: 2.5em;
            margin-bottom: 10px;
            font-weight: 700;
        }

        header p {
            font-size: 1.1em;
            opacity: 0.9;
            margin-bottom: 20px;
        }

        .contact-info {
            display: flex;
            justify-content: center;
            gap: 30px;
            margin-top: 20px;
            flex-wrap: wrap;
        }

        .contact-info span {
            font-size: 0.95em;
            opacity: 0.9;
        }

        .container {
            max-width: 900px;
            margin: 0 auto;
            padding: 0 20px;
        }

        section {
            background: white;
            margin: 40px auto;
            padding: 40px;
            border-radius: 8px;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }

        section h2 {
            color: #667eea;
            font-size: 1.8em;
            margin-bottom: 30px;
            padding-bottom: 10px;
            border-bottom: 3px solid #667eea;
        }

        .skill-tags {
            display: flex;
            flex-wrap: wrap;
            gap: 10px;
            margin-bottom: 10px;
        }

        .skill-tag {
            background: #667eea;
            color: white;
            padding: 8px 15px;
            border-radius: 20px;
            font-size: 0.9em;
            transition: all 0.3s ease;
        }

        .skill-tag:hover {
            background: #764ba2;
            transform: translateY(-2px);
            box-shadow: 0 4px 12px rgba(102, 126, 234, 0.4);
        }

        .experience-item {
            margin-bottom: 30px;
            padding-bottom: 20px;
            border-bottom: 1px solid #e0e0e0;
        }

        .experience-item:last-child {
            border-bottom: none;
        }

        .experience-item h3 {
            color: #333;
            margin-bottom: 5px;
            font-size: 1.1em;
        }

        .experience-item .date {
            color: #666;
            font-size: 0.9em;
            font-style: italic;
            margin-bottom: 10px;
        }

        .about-text {
            color: #555;
            line-height: 1.8;
            margin-bottom: 20px;
        }

        footer {
            background: #333;
            color: white;
            text-align: center;
            padding: 30px 20px;
            margin-top: 60px;
        }

        footer p {
            margin: 10px 0;
        }

        @media (max-width: 768px) {
            header h1 {
                font-size: 1.8em;
            }

            section {
                padding: 30px 20px;
                margin: 30px auto;
            }

            .contact-info {
                flex-direction: column;
                gap: 15px;
            }

            .skill-tags {
                gap: 8px;
            }

            .skill-tag {
                padding: 6px 12px;
                font-size: 0.85em;
            }
        }
    </style>
</head>
<body>
    <header>
        <h1>Professional Portfolio</h1>
        <p>Building beautiful digital experiences</p>
        <div class="contact-info">
            <span>📧 {email}</span>
            <span>📱 {phone}</span>
        </div>
    </header>

    <div class="container">
        <section id="about">
            <h2>About Me</h2>
            <p class="about-text">
                I'm a passionate developer dedicated to creating innovative solutions and delivering high-quality software.
                With a strong foundation in full-stack development and a commitment to continuous learning,
                I strive to make a meaningful impact through technology.
            </p>
        </section>

        <section id="skills">
            <h2>Skills &amp; Expertise</h2>
            <div class="skill-tags">
                {skills_html}
            </div>
        </section>

        <section id="experience">
            <h2>Experience</h2>
            <div class="experience-item">
                <h3>Professional Experience</h3>
                <p class="about-text">{experience}</p>
            </div>
        </section>

        <section id="education">
            <h2>Education</h2>
            <div class="experience-item">
                <h3>Academic Background</h3>
                <p class="about-text">{education}</p>
            </div>
        </section>
    </div>

    <footer>
        <p>&copy; 2026 Professional Portfolio. All rights reserved.</p>
        <p>Built with HTML &amp; CSS</p>
    </footer>
</body>
</html>"#;
