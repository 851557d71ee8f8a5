//! Built-in course list and question schemas

use super::{Course, CourseEntry, CourseId, Question};

fn question(key: &str, prompt: &str, options: [&str; 4]) -> Question {
    Question {
        key: key.to_string(),
        prompt: prompt.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
    }
}

fn entry(
    id: CourseId,
    title: &str,
    description: &str,
    accent: &str,
    questions: [Question; 3],
) -> CourseEntry {
    CourseEntry {
        course: Course {
            id,
            title: title.to_string(),
            description: description.to_string(),
            accent: accent.to_string(),
        },
        questions: questions.into(),
    }
}

/// All built-in courses, in landing-page order
pub fn builtin_entries() -> Vec<CourseEntry> {
    vec![
        entry(
            CourseId::DigitalMarketing,
            "Digital Marketing",
            "Master SEO, social media, and online advertising strategies",
            "#667eea",
            [
                question(
                    "experience",
                    "What is your current experience level with digital marketing?",
                    ["Complete Beginner", "Some Experience", "Intermediate", "Advanced"],
                ),
                question(
                    "goals",
                    "What are your main goals with digital marketing?",
                    ["Start a Career", "Grow My Business", "Freelancing", "Skill Enhancement"],
                ),
                question(
                    "timeline",
                    "When would you like to start the course?",
                    ["Immediately", "Within 1 Month", "Within 3 Months", "Flexible"],
                ),
            ],
        ),
        entry(
            CourseId::VideoProduction,
            "Video Production",
            "Learn professional video creation and storytelling techniques",
            "#f093fb",
            [
                question(
                    "experience",
                    "Do you have any video production experience?",
                    ["No Experience", "Basic Editing", "Some Production", "Professional Level"],
                ),
                question(
                    "goals",
                    "What type of videos do you want to create?",
                    ["YouTube Content", "Marketing Videos", "Documentaries", "Personal Projects"],
                ),
                question(
                    "timeline",
                    "How quickly do you want to start creating videos?",
                    ["Start Immediately", "1-2 Weeks", "1 Month", "No Rush"],
                ),
            ],
        ),
        entry(
            CourseId::GraphicDesign,
            "Graphic Design",
            "Create stunning visuals and brand identities",
            "#4facfe",
            [
                question(
                    "experience",
                    "What is your design background?",
                    ["Complete Beginner", "Hobbyist", "Some Training", "Professional"],
                ),
                question(
                    "goals",
                    "What type of design work interests you most?",
                    ["Logo Design", "Web Design", "Print Design", "Brand Identity"],
                ),
                question(
                    "timeline",
                    "When do you plan to start your design journey?",
                    ["Right Away", "Next Month", "Within 3 Months", "Just Exploring"],
                ),
            ],
        ),
        entry(
            CourseId::WebDevelopmentNative,
            "Web Development Native",
            "Build websites with HTML, CSS, and JavaScript",
            "#a8edea",
            [
                question(
                    "experience",
                    "What is your programming experience?",
                    ["Never Coded", "Basic HTML/CSS", "Some JavaScript", "Other Languages"],
                ),
                question(
                    "goals",
                    "What type of websites do you want to build?",
                    ["Personal Portfolio", "Business Websites", "E-commerce", "Web Apps"],
                ),
                question(
                    "timeline",
                    "When do you want to start coding?",
                    ["Immediately", "Within 2 Weeks", "Next Month", "Flexible"],
                ),
            ],
        ),
        entry(
            CourseId::WebDevelopmentFullStack,
            "Web Development Full Stack",
            "Complete web development with frontend and backend",
            "#ffecd2",
            [
                question(
                    "experience",
                    "Do you have any web development experience?",
                    ["Complete Beginner", "Frontend Only", "Backend Only", "Some Full Stack"],
                ),
                question(
                    "goals",
                    "What is your career goal?",
                    ["Get First Dev Job", "Career Change", "Freelancing", "Build Own Startup"],
                ),
                question(
                    "timeline",
                    "How committed are you to learning?",
                    ["Full-time Study", "Part-time (Evenings)", "Weekends Only", "Flexible"],
                ),
            ],
        ),
        entry(
            CourseId::MobileDevelopment,
            "Mobile Development",
            "Create mobile apps for iOS and Android platforms",
            "#a18cd1",
            [
                question(
                    "experience",
                    "Do you have mobile development experience?",
                    ["No Experience", "Web Development", "Native Development", "Cross-platform"],
                ),
                question(
                    "goals",
                    "Which platform are you most interested in?",
                    ["iOS (iPhone)", "Android", "Cross-platform", "Both Native"],
                ),
                question(
                    "timeline",
                    "When do you want to publish your first app?",
                    ["Within 3 Months", "Within 6 Months", "Within 1 Year", "No Timeline"],
                ),
            ],
        ),
        entry(
            CourseId::AlgorithmicBasics,
            "Algorithmic Basics",
            "Master programming fundamentals and problem-solving",
            "#fad0c4",
            [
                question(
                    "experience",
                    "What is your programming background?",
                    ["Never Programmed", "Basic Syntax", "Some Projects", "Professional"],
                ),
                question(
                    "goals",
                    "Why do you want to learn algorithms?",
                    ["Job Interviews", "Problem Solving", "Academic Purposes", "General Interest"],
                ),
                question(
                    "timeline",
                    "How much time can you dedicate daily?",
                    ["1 Hour", "2-3 Hours", "4+ Hours", "Weekends Only"],
                ),
            ],
        ),
        entry(
            CourseId::PythonBasic,
            "Python Basic",
            "Learn Python programming from scratch to advanced",
            "#667eea",
            [
                question(
                    "experience",
                    "Have you programmed before?",
                    ["Complete Beginner", "Other Languages", "Some Python", "Advanced"],
                ),
                question(
                    "goals",
                    "What do you want to use Python for?",
                    ["Data Science", "Web Development", "Automation", "General Programming"],
                ),
                question(
                    "timeline",
                    "When do you want to start building projects?",
                    ["Immediately", "1 Month", "3 Months", "Take My Time"],
                ),
            ],
        ),
        entry(
            CourseId::VideoEditing,
            "Video Editing",
            "Master video editing with professional tools and techniques",
            "#f5576c",
            [
                question(
                    "experience",
                    "What is your video editing experience?",
                    ["Never Edited", "Basic Phone Apps", "Some Software", "Professional Tools"],
                ),
                question(
                    "goals",
                    "What type of content do you want to edit?",
                    ["Social Media", "YouTube Videos", "Professional Work", "Personal Projects"],
                ),
                question(
                    "timeline",
                    "How quickly do you need these skills?",
                    ["Urgent (1 Week)", "Soon (1 Month)", "Moderate (3 Months)", "No Rush"],
                ),
            ],
        ),
    ]
}
