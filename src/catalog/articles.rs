//! Article catalog and naive search.

use crate::events::entities::ArticleEntity;

/// Number of results offered in the quick-search dropdown.
pub const QUICK_SEARCH_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Article {
    pub id: &'static str,
    pub slug: &'static str,
    pub title: &'static str,
    pub excerpt: &'static str,
    pub author: &'static str,
    pub date: &'static str,
    pub category: &'static str,
    pub read_time_minutes: u32,
}

impl Article {
    pub fn entity(&self) -> ArticleEntity {
        ArticleEntity::new(self.id, self.title, self.author, self.category)
    }

    fn matches(&self, needle: &str) -> bool {
        [self.title, self.excerpt, self.author, self.category]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

pub const ARTICLES: &[Article] = &[
    Article {
        id: "1",
        slug: "future-ai-journalism",
        title: "The Future of Artificial Intelligence in Journalism",
        excerpt: "Exploring how AI is transforming newsrooms and content creation across the media landscape.",
        author: "Sarah Johnson",
        date: "2025-01-15",
        category: "AI",
        read_time_minutes: 5,
    },
    Article {
        id: "2",
        slug: "tech-companies-climate-initiative",
        title: "Breaking: Major Tech Companies Announce Climate Initiative",
        excerpt: "Leading technology firms commit to carbon neutrality by 2030 in unprecedented collaboration.",
        author: "Michael Chen",
        date: "2025-01-14",
        category: "Business",
        read_time_minutes: 3,
    },
    Article {
        id: "3",
        slug: "independent-media-platforms",
        title: "The Rise of Independent Media Platforms",
        excerpt: "How creator-driven content is reshaping traditional media consumption patterns.",
        author: "Emily Rodriguez",
        date: "2025-01-13",
        category: "Technology",
        read_time_minutes: 7,
    },
    Article {
        id: "4",
        slug: "cybersecurity-trends-2025",
        title: "Cybersecurity Trends to Watch in 2025",
        excerpt: "Industry experts share insights on emerging threats and protection strategies.",
        author: "David Kim",
        date: "2025-01-12",
        category: "Technology",
        read_time_minutes: 6,
    },
    Article {
        id: "5",
        slug: "digital-privacy-modern-age",
        title: "Digital Privacy in the Modern Age",
        excerpt: "Understanding the challenges and solutions for protecting personal data online.",
        author: "Alex Thompson",
        date: "2024-12-15",
        category: "Technology",
        read_time_minutes: 4,
    },
    Article {
        id: "6",
        slug: "machine-learning-healthcare",
        title: "Machine Learning in Healthcare",
        excerpt: "How AI is revolutionizing medical diagnosis and treatment.",
        author: "Maria Garcia",
        date: "2024-12-10",
        category: "AI",
        read_time_minutes: 6,
    },
    Article {
        id: "7",
        slug: "startup-funding-reaches-record-high-in-q4-2024",
        title: "Startup Funding Reaches Record High in Q4 2024",
        excerpt: "Venture capital investment surges as investors bet on emerging technologies and market recovery.",
        author: "Jennifer Lee",
        date: "2024-12-05",
        category: "Business",
        read_time_minutes: 4,
    },
    Article {
        id: "8",
        slug: "5g-networks-mobile-connectivity",
        title: "5G Networks: Transforming Mobile Connectivity",
        excerpt: "The rollout of 5G technology is revolutionizing how we connect and communicate globally.",
        author: "Rachel Green",
        date: "2024-11-28",
        category: "Technology",
        read_time_minutes: 5,
    },
    Article {
        id: "9",
        slug: "chatgpt-conversational-ai",
        title: "ChatGPT and the Future of Conversational AI",
        excerpt: "Examining the impact of large language models on human-computer interaction and communication.",
        author: "Elena Vasquez",
        date: "2024-11-20",
        category: "AI",
        read_time_minutes: 7,
    },
    Article {
        id: "10",
        slug: "cloud-computing-data-storage",
        title: "Cloud Computing: The Future of Data Storage",
        excerpt: "Exploring how cloud infrastructure is becoming the backbone of modern digital operations.",
        author: "Mark Thompson",
        date: "2024-11-15",
        category: "Technology",
        read_time_minutes: 8,
    },
    Article {
        id: "11",
        slug: "future-remote-work-strategies",
        title: "The Future of Remote Work: Corporate Strategies",
        excerpt: "How leading companies are adapting their business models for the hybrid work environment.",
        author: "Robert Martinez",
        date: "2024-11-10",
        category: "Business",
        read_time_minutes: 6,
    },
    Article {
        id: "12",
        slug: "quantum-computing-breakthrough",
        title: "Quantum Computing Breakthrough Announced",
        excerpt: "Scientists achieve new milestone in quantum processing power with potential industry applications.",
        author: "Dr. Lisa Chen",
        date: "2024-11-05",
        category: "Technology",
        read_time_minutes: 6,
    },
    Article {
        id: "13",
        slug: "evolution-social-media",
        title: "The Evolution of Social Media",
        excerpt: "Tracing the journey from early online forums to today's immersive, algorithm-driven social platforms.",
        author: "Lisa Park",
        date: "2024-10-30",
        category: "Business",
        read_time_minutes: 5,
    },
    Article {
        id: "14",
        slug: "blockchain-beyond-crypto",
        title: "Blockchain Beyond Cryptocurrency",
        excerpt: "Exploring the revolutionary applications of blockchain technology across industries beyond digital currencies.",
        author: "James Wilson",
        date: "2024-10-25",
        category: "Technology",
        read_time_minutes: 8,
    },
];

pub fn article_by_slug(slug: &str) -> Option<&'static Article> {
    ARTICLES.iter().find(|a| a.slug == slug)
}

pub fn articles_in_category(category: &str) -> Vec<&'static Article> {
    ARTICLES.iter().filter(|a| a.category == category).collect()
}

/// Case-insensitive substring match over title, excerpt, author and
/// category, in catalog order. A blank query matches nothing.
pub fn search_articles(query: &str) -> Vec<&'static Article> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    ARTICLES.iter().filter(|a| a.matches(&needle)).collect()
}

/// Dropdown results: the first [`QUICK_SEARCH_LIMIT`] matches.
pub fn quick_search(query: &str) -> Vec<&'static Article> {
    let mut results = search_articles(query);
    results.truncate(QUICK_SEARCH_LIMIT);
    results
}
