use super::TextId;

pub(super) fn text(id: TextId) -> &'static str {
    match id {
        TextId::Start => "خوش اومدی! از دستور /link برای دریافت لینک ناشناس خودت استفاده بکن",
        TextId::Info => "ربات پیام ناشناس\n\nلینک خودت رو به اشتراک بذار و بدون فاش شدن هویت کسی پیام دریافت کن.",
        TextId::InitialSendPrompt => "در حال ارسال پیام ناشناس به {} هستید.\n\n پیغام خود را بنویسید:",
        TextId::UnblockButton => "آنبلاک",
        TextId::SendMessageButton => "ارسال پیغام",
        TextId::ReplyButton => "پاسخ بده",
        TextId::BlockButton => "بلاک کن",
        TextId::UnblockAllResult => "تمامی کاربران آنبلاک شدند!",
        TextId::UserBlocked => "کاربر بلاک شد!",
        TextId::UserUnblocked => "کاربر آنبلاک شد!",
        TextId::CancelButton => "لغو",
        TextId::YourLanguage => "زبان انتخابی شما: {}",
        TextId::NoPreferredLanguage => "شما زبان ترجیح داده شده‌ای ندارید",
        TextId::NeverMind => "بیخیال!",
        TextId::LanguageUpdated => "زبان با موفقیت به فارسی تغییر پیدا کرد.",
        TextId::LanguageUpdatedAlert => "زبان تغییر کرد!",
        TextId::YouHaveBlockedThisUser => "شما این کاربر را بلاک کرده‌اید",
        TextId::ThisUserHasBlockedYou => "این کاربر شما را بلاک کرده است",
        TextId::NewMessage => "شما یک پیغام جدید دارید.",
        TextId::NewReply => "پاسخ جدید به پیغام شما",
        TextId::MessageSent => "پیغام ارسال شد!",
        TextId::OpenMessageButton => "پیغام را باز کن",
        TextId::MessageOpened => "پیغام باز شد!",
        TextId::ReplyingToMessage => "در حال پاسخ دادن به پیغام...",
        TextId::ReplyToThisMessage => "به این پیغام پاسخ بده:",
        TextId::UserNotFound => "کاربر پیدا نشد! لینک اشتباهی؟",
        TextId::MessageToYourself => "واقعا می‌خواهی با خودت حرف بزنی؟ چه غمگین! لینک خودت رو با دوستات به اشتراک بذار و یا روی شبکه‌های اجتماعی پست کن تا پیغام‌های ناشناس بگیری!",
        TextId::Link => "افراد دیگر با استفاده از این لینک می‌توانند به شما پیغام ناشناس بفرستند:",
        TextId::Or => "یا:",
        TextId::InvalidCommand => "دستور نامعتبر!",
        TextId::Error => "خطا: {}",
        TextId::YourCurrentUsername => "نام کاربری فعلی شما: {}",
        TextId::ChangeUsernameButton => "تغییر بده",
        TextId::RemoveUsernameButton => "حذف کن",
        TextId::NoUsername => "شما نام کاربری ندارید!",
        TextId::SetUsernameButton => "یکی انتخاب کن",
        TextId::UsernameExplanation => "یک نام کاربری انتخاب کنید که ۳ الی ۲۰ کارکتر داشته باشد. فقط شامل حروف و اعداد انگلیسی و یا آندرلاین (_) باشد و با یک حرف شروع شود. نام‌های کاربری بصورت اتوماتیک به حروف کوچک تبدیل می‌شوند.",
        TextId::EnterNewUsername => "یک نام کاربری جدید وارد کنید:",
        TextId::SettingUsername => "در حال تنظیم نام کاربری...",
        TextId::UsernameRemoved => "نام کاربری پاک شد!",
        TextId::InvalidUsername => "نام کاربری وارد شده نامعتبر است. یکی دیگر انتخاب کنید:",
        TextId::UsernameSet => "نام کاربری اعمال شد: {}",
        TextId::UsernameExists => "نام کاربری وارد شده قبلا انتخاب شده است. یکی دیگر وارد کنید:",
        TextId::SameUsername => "تو همین الان این نام کاربری رو داری باهوش! اگه می خواهی تغییرش بدی، دستور نام کاربری رو یک بار دیگه اجرا کن!",
        TextId::NotRegistered => "ربات هنوز عمومی نشده! :(\nاگر کد دعوت داری، با دستور /register حسابت رو فعال کن.",
        TextId::NoInvitations => "شما هیچ دعوت‌نامه‌ای ندارید!",
        TextId::InvitationSummary => "تعداد دعوت‌های باقی‌مانده: {}\nتعداد دعوت‌های استفاده شده: {}",
        TextId::NoGeneratedCodes => "شما هنوز هیچ کد دعوتی نساخته‌اید.",
        TextId::GeneratedCodes => "شما {} کد دعوت ساخته‌اید:",
        TextId::GenerateCodeButton => "ساخت کد",
        TextId::NoInvitationsLeft => "هیچ کد دعوتی برای شما باقی نمانده است!",
        TextId::NoInvitationsLeftAlert => "دعوتی باقی نمانده!",
        TextId::EnterInvitationUsages => "تعداد دفعات قابل استفاده این کد را وارد کنید.\nاین عدد نباید از تعداد دعوت‌های باقی‌مانده شما که در حال حاضر {} است بیشتر باشد.",
        TextId::GeneratingInvitation => "در حال ساخت کد دعوت...",
        TextId::InvalidInvitationCount => "ورودی یک عدد صحیح معتبر نیست. دوباره وارد کنید.",
        TextId::QuotaExceeded => "در حال حاضر فقط {} دعوت برای شما باقی مانده و نمی‌توانید کدی با {} بار استفاده بسازید.",
        TextId::InvitationCreated => "کد دعوت ساخته شد!\n\nکد: {}\nدفعات باقی‌مانده: {}",
        TextId::EnterInvitationCode => "اگر کد دعوت داری، آن را وارد کن.",
        TextId::AlreadyRegistered => "تو قبلا ثبت‌نام کردی باهوش!",
        TextId::InvalidInvitationCode => "کد وارد شده نامعتبر است یا قبلا استفاده شده. لطفا کد را بررسی کرده و دوباره وارد کنید.",
        TextId::Registered => "ثبت‌نام با موفقیت انجام شد! حالا با دستور /link لینک خودت رو بگیر و شروع کن! :)",
        TextId::RegistrationCancelled => "باشه! هر وقت کد دعوت معتبری گرفتی با دستور /register واردش کن!",
    }
}
