use crate::model::{
    AboutPage, AdSettings, AppSettings, Book, Category, ContentPart, DeveloperInfo,
    GistSyncSettings, PromotionalAd, ThemeTokens,
};

/// Settings used when nothing has been persisted yet, or after a reset.
pub fn default_settings() -> AppSettings {
    AppSettings {
        site_name: "مكتبة الحكايات".to_owned(),
        logo_url: None,
        colors: ThemeTokens {
            background: "bg-slate-900".to_owned(),
            text: "text-slate-200".to_owned(),
            primary: "text-amber-400".to_owned(),
            secondary: "text-sky-400".to_owned(),
            card_bg: "bg-slate-800".to_owned(),
        },
        ad: AdSettings {
            url: "https://google.com".to_owned(),
            duration: 20,
            alternate_urls: Vec::new(),
            watch_urls: Vec::new(),
        },
        developer: DeveloperInfo {
            name: "مطور عربي".to_owned(),
            email: "dev@arabcode.com".to_owned(),
            copyright: "جميع الحقوق محفوظة © مكتبة الحكايات 2025".to_owned(),
        },
        categories: vec![
            category("c1", "الروايات العربية", "📚", arabic_books()),
            category(
                "c2",
                "الروايات العالمية",
                "🌍",
                vec![single_part_book(
                    "en1",
                    "مئة عام من العزلة",
                    "غابرييل غارسيا ماركيز",
                    "bg-purple-100",
                    "قراءة الرواية",
                    "محتوى رواية مئة عام من العزلة...",
                )],
            ),
            category(
                "c3",
                "قصص الأطفال",
                "🧒",
                vec![single_part_book(
                    "ch1",
                    "مغامرات سندباد",
                    "تراث",
                    "bg-green-100",
                    "قراءة القصة",
                    "محتوى قصة مغامرات سندباد...",
                )],
            ),
            category(
                "c4",
                "الأدب الرومانسي",
                "💖",
                vec![single_part_book(
                    "ro1",
                    "كبرياء وهوى",
                    "جين أوستن",
                    "bg-pink-100",
                    "قراءة الرواية",
                    "محتوى رواية كبرياء وهوى...",
                )],
            ),
            category(
                "c5",
                "الغموض والخيال",
                "🕵️‍♂️",
                vec![single_part_book(
                    "my1",
                    "جريمة في قطار الشرق",
                    "أجاثا كريستي",
                    "bg-gray-200",
                    "قراءة الرواية",
                    "محتوى رواية جريمة في قطار الشرق...",
                )],
            ),
            category(
                "c6",
                "التنمية البشرية",
                "🧠",
                vec![single_part_book(
                    "dv1",
                    "العادات السبع للناس الأكثر فعالية",
                    "ستيفن كوفي",
                    "bg-sky-100",
                    "قراءة الكتاب",
                    "محتوى كتاب العادات السبع...",
                )],
            ),
        ],
        promotional_ads: vec![
            PromotionalAd {
                id: "p1".to_owned(),
                image_url: "https://placehold.co/600x300/0ea5e9/ffffff?text=إعلان+ترويجي"
                    .to_owned(),
                title: "عرض خاص".to_owned(),
                description: "اكتشف مجموعتنا الجديدة من كتب الخيال العلمي بخصم 20%!".to_owned(),
                link_url: "#".to_owned(),
            },
            PromotionalAd {
                id: "p2".to_owned(),
                image_url: "https://placehold.co/600x300/f59e0b/ffffff?text=كتاب+الشهر".to_owned(),
                title: "رواية الشهر".to_owned(),
                description: "انضم لآلاف القراء واستمتع بالرواية الأكثر مبيعاً هذا الشهر."
                    .to_owned(),
                link_url: "#".to_owned(),
            },
        ],
        about: AboutPage {
            title: "حول مكتبة الحكايات".to_owned(),
            content: "مكتبة الحكايات هي منصة عربية تهدف إلى نشر المعرفة وتشجيع القراءة عبر توفير مجموعة واسعة من الكتب والروايات من مختلف الثقافات والعصور. نحن نؤمن بأن القراءة هي نافذة تطل على عوالم جديدة، ونسعى لجعل هذه التجربة متاحة وممتعة للجميع.\n\nندعم استمرارية الموقع من خلال نموذج إعلاني بسيط لا يؤثر على تجربة المستخدم، مما يتيح لنا تقديم المحتوى مجاناً. شكراً لدعمكم!".to_owned(),
        },
        gist_sync: GistSyncSettings::default(),
    }
}

fn arabic_books() -> Vec<Book> {
    vec![
        Book {
            id: "ar1".to_owned(),
            title: "ثلاثية غرناطة".to_owned(),
            author: "رضوى عاشور".to_owned(),
            cover_color: "bg-teal-100".to_owned(),
            click_count: 0,
            parts: vec![
                ContentPart {
                    watch_url: Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_owned()),
                    ..part(
                        "ar1p1",
                        "الجزء الأول: غرناطة",
                        "https://example.com/ad-granada",
                        "محتوى الجزء الأول من رواية ثلاثية غرناطة...",
                    )
                },
                part(
                    "ar1p2",
                    "الجزء الثاني: مريمة",
                    "https://example.com/ad-mariam",
                    "محتوى الجزء الثاني...",
                ),
                part(
                    "ar1p3",
                    "الجزء الثالث: الرحيل",
                    "https://example.com/ad-departure",
                    "محتوى الجزء الثالث...",
                ),
            ],
        },
        single_part_book(
            "ar2",
            "أولاد حارتنا",
            "نجيب محفوظ",
            "bg-amber-100",
            "قراءة الرواية",
            "محتوى رواية أولاد حارتنا...",
        ),
    ]
}

fn category(id: &str, title: &str, emoji: &str, books: Vec<Book>) -> Category {
    Category {
        id: id.to_owned(),
        title: title.to_owned(),
        emoji: emoji.to_owned(),
        books,
    }
}

fn part(id: &str, title: &str, ad_url: &str, content: &str) -> ContentPart {
    ContentPart {
        id: id.to_owned(),
        title: title.to_owned(),
        content: content.to_owned(),
        watch_url: None,
        ad_url: Some(ad_url.to_owned()),
        duration: None,
    }
}

fn single_part_book(
    id: &str,
    title: &str,
    author: &str,
    cover_color: &str,
    part_title: &str,
    content: &str,
) -> Book {
    Book {
        id: id.to_owned(),
        title: title.to_owned(),
        author: author.to_owned(),
        cover_color: cover_color.to_owned(),
        click_count: 0,
        parts: vec![part(&format!("{id}p1"), part_title, "", content)],
    }
}
