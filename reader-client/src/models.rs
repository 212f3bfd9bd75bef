use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Пост блога.
pub struct Post {
    /// Идентификатор поста.
    pub id: i64,
    /// Идентификатор автора.
    pub user_id: i64,
    /// Заголовок поста.
    pub title: String,
    /// Текст поста.
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Комментарий к посту.
pub struct Comment {
    /// Идентификатор комментария.
    pub id: i64,
    /// Идентификатор поста, к которому относится комментарий.
    pub post_id: i64,
    /// Имя автора комментария.
    pub name: String,
    /// Email автора комментария.
    pub email: String,
    /// Текст комментария.
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Географические координаты адреса (строки, как в исходном API).
pub struct Geo {
    /// Широта.
    pub lat: String,
    /// Долгота.
    pub lng: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Почтовый адрес пользователя.
pub struct Address {
    /// Улица.
    pub street: String,
    /// Квартира/офис.
    pub suite: String,
    /// Город.
    pub city: String,
    /// Почтовый индекс.
    pub zipcode: String,
    /// Координаты.
    pub geo: Geo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Компания пользователя.
pub struct Company {
    /// Название.
    pub name: String,
    /// Слоган.
    pub catch_phrase: String,
    /// Теглайн (`bs` в исходном API).
    pub bs: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Пользователь (автор постов).
pub struct User {
    /// Идентификатор пользователя.
    pub id: i64,
    /// Отображаемое имя.
    pub name: String,
    /// Логин.
    pub username: String,
    /// Email.
    pub email: String,
    /// Адрес.
    pub address: Address,
    /// Телефон.
    pub phone: String,
    /// Сайт.
    pub website: String,
    /// Компания.
    pub company: Company,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Фотоальбом пользователя.
pub struct Album {
    /// Идентификатор альбома.
    pub id: i64,
    /// Идентификатор владельца.
    pub user_id: i64,
    /// Название.
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Фотография в альбоме.
pub struct Photo {
    /// Идентификатор фото.
    pub id: i64,
    /// Идентификатор альбома.
    pub album_id: i64,
    /// Подпись.
    pub title: String,
    /// URL полного изображения.
    pub url: String,
    /// URL превью.
    pub thumbnail_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Задача из списка дел пользователя.
pub struct Todo {
    /// Идентификатор задачи.
    pub id: i64,
    /// Идентификатор владельца.
    pub user_id: i64,
    /// Формулировка.
    pub title: String,
    /// Выполнена ли задача.
    pub completed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_reads_camel_case_owner() {
        let raw = r#"{"userId":1,"id":7,"title":"t","body":"b"}"#;
        let post: Post = serde_json::from_str(raw).expect("post should parse");
        assert_eq!(post.user_id, 1);
        assert_eq!(post.id, 7);
    }

    #[test]
    fn user_reads_nested_address_and_company() {
        let raw = r#"{
            "id": 1,
            "name": "Leanne Graham",
            "username": "Bret",
            "email": "Sincere@april.biz",
            "address": {
                "street": "Kulas Light",
                "suite": "Apt. 556",
                "city": "Gwenborough",
                "zipcode": "92998-3874",
                "geo": { "lat": "-37.3159", "lng": "81.1496" }
            },
            "phone": "1-770-736-8031 x56442",
            "website": "hildegard.org",
            "company": {
                "name": "Romaguera-Crona",
                "catchPhrase": "Multi-layered client-server neural-net",
                "bs": "harness real-time e-markets"
            }
        }"#;

        let user: User = serde_json::from_str(raw).expect("user should parse");
        assert_eq!(user.username, "Bret");
        assert_eq!(user.address.geo.lat, "-37.3159");
        assert_eq!(user.company.catch_phrase, "Multi-layered client-server neural-net");
    }

    #[test]
    fn photo_reads_thumbnail_url() {
        let raw = r#"{"albumId":2,"id":51,"title":"p","url":"https://x/1","thumbnailUrl":"https://x/t1"}"#;
        let photo: Photo = serde_json::from_str(raw).expect("photo should parse");
        assert_eq!(photo.album_id, 2);
        assert_eq!(photo.thumbnail_url, "https://x/t1");
    }
}
