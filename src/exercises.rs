//! Static coping exercises offered to tired or low users

use serde::Serialize;

/// One of the four fixed exercises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Exercise {
    Breathing,
    NeckStretch,
    MiniWalk,
    EyeGymnastics,
}

impl Exercise {
    pub const ALL: [Exercise; 4] = [
        Exercise::Breathing,
        Exercise::NeckStretch,
        Exercise::MiniWalk,
        Exercise::EyeGymnastics,
    ];

    /// Callback payload carried by the menu button
    pub fn action_id(self) -> &'static str {
        match self {
            Exercise::Breathing => "exercise1",
            Exercise::NeckStretch => "exercise2",
            Exercise::MiniWalk => "exercise3",
            Exercise::EyeGymnastics => "exercise4",
        }
    }

    pub fn from_action_id(action_id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.action_id() == action_id)
    }

    pub fn label(self) -> &'static str {
        match self {
            Exercise::Breathing => "Упражнение 1",
            Exercise::NeckStretch => "Упражнение 2",
            Exercise::MiniWalk => "Упражнение 3",
            Exercise::EyeGymnastics => "Упражнение 4",
        }
    }

    pub fn instructions(self) -> &'static str {
        match self {
            Exercise::Breathing => concat!(
                "Упражнение 1: Глубокое дыхание\n\n",
                "1. Сядьте удобно и расслабьтесь\n",
                "2. Сделайте глубокий вдох через нос на 4 счета\n",
                "3. Задержите дыхание на 4 счета\n",
                "4. Медленно выдохните через рот на 4 счета\n",
                "5. Повторите 5-7 раз\n\n",
                "Это упражнение поможет снять напряжение и восстановить энергию."
            ),
            Exercise::NeckStretch => concat!(
                "Упражнение 2: Растяжка шеи\n\n",
                "1. Сядьте прямо\n",
                "2. Медленно наклоните голову вправо, задержитесь на 10 секунд\n",
                "3. Вернитесь в исходное положение\n",
                "4. Повторите влево\n",
                "5. Сделайте по 3-4 раза в каждую сторону\n\n",
                "Это упражнение поможет снять напряжение в шее и плечах."
            ),
            Exercise::MiniWalk => concat!(
                "Упражнение 3: Мини-прогулка\n\n",
                "1. Встаньте и пройдитесь по комнате 2-3 минуты\n",
                "2. Делайте это в спокойном темпе\n",
                "3. Следите за дыханием\n",
                "4. Можно выйти на свежий воздух, если есть возможность\n\n",
                "Это упражнение поможет разогнать кровь и взбодриться."
            ),
            Exercise::EyeGymnastics => concat!(
                "Упражнение 4: Гимнастика для глаз\n\n",
                "1. Закройте глаза на 10 секунд\n",
                "2. Откройте и посмотрите вдаль 10 секунд\n",
                "3. Сделайте круговые движения глазами по часовой стрелке\n",
                "4. Повторите против часовой стрелки\n",
                "5. Сделайте 3-4 подхода\n\n",
                "Это упражнение поможет снять напряжение с глаз и улучшить концентрацию."
            ),
        }
    }
}

/// A labeled action rendered as a button
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuAction {
    pub label: String,
    pub action_id: String,
}

/// Grid of actions attached to an outbound message, row by row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Menu {
    pub rows: Vec<Vec<MenuAction>>,
}

impl Menu {
    /// The fixed 2x2 exercise grid
    pub fn exercises() -> Self {
        let rows = Exercise::ALL
            .chunks(2)
            .map(|row| {
                row.iter()
                    .map(|e| MenuAction {
                        label: e.label().to_string(),
                        action_id: e.action_id().to_string(),
                    })
                    .collect()
            })
            .collect();
        Self { rows }
    }

    pub fn actions(&self) -> impl Iterator<Item = &MenuAction> {
        self.rows.iter().flatten()
    }
}
